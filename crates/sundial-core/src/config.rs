use config::Config;
use serde::Deserialize;

use crate::constants::{DEFAULT_DAV_PREFIX, DEFAULT_STORE_TIMEOUT_SECS};
use crate::error::{CoreError, CoreResult};

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub store: StoreConfig,
    pub dav: DavConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// Upper bound on a single store adapter call, in seconds.
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DavConfig {
    /// Path prefix under which calendar object resources are exposed.
    pub href_prefix: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

impl Settings {
    /// ## Summary
    /// Loads configuration from defaults, environment variables and an
    /// optional `config.toml`. Environment variables take precedence over
    /// file values.
    ///
    /// ## Errors
    /// Returns an error if building the configuration or deserializing it fails.
    pub fn load() -> CoreResult<Self> {
        Config::builder()
            .set_default("store.timeout_secs", DEFAULT_STORE_TIMEOUT_SECS)
            .map_err(|e| CoreError::Config(e.to_string()))?
            .set_default("dav.href_prefix", DEFAULT_DAV_PREFIX)
            .map_err(|e| CoreError::Config(e.to_string()))?
            .set_default("logging.level", "debug")
            .map_err(|e| CoreError::Config(e.to_string()))?
            // Env file
            .add_source(
                config::Environment::default()
                    .convert_case(config::Case::Snake)
                    .separator("_")
                    .ignore_empty(true)
                    .try_parsing(true),
            )
            // TOML file
            .add_source(config::File::with_name("config.toml").required(false))
            .build()
            .map_err(|e| CoreError::Config(e.to_string()))?
            .try_deserialize::<Self>()
            .map_err(|e| CoreError::Config(e.to_string()))
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            store: StoreConfig {
                timeout_secs: DEFAULT_STORE_TIMEOUT_SECS,
            },
            dav: DavConfig {
                href_prefix: DEFAULT_DAV_PREFIX.to_string(),
            },
            logging: LoggingConfig {
                level: "debug".to_string(),
            },
        }
    }
}

/// ## Summary
/// Loads configuration from environment variables and `.env` file.
///
/// ## Errors
/// Returns an error if loading or deserializing the configuration fails.
pub fn load_config() -> CoreResult<Settings> {
    dotenvy::dotenv().ok();

    Settings::load()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.store.timeout_secs, DEFAULT_STORE_TIMEOUT_SECS);
        assert_eq!(settings.dav.href_prefix, "/dav");
    }
}

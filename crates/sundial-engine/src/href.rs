//! Resource path schemes.

use sundial_core::constants::DEFAULT_DAV_PREFIX;
use sundial_rfc::rfc::dav::core::Href;

/// Maps an object uid to its resource href.
///
/// The path layout belongs to the deployment, not the engine, so it
/// is injected rather than hardcoded.
pub trait HrefScheme: Send + Sync {
    /// Returns the href for the object with the given uid.
    fn href_for(&self, uid: &str) -> Href;
}

/// The standard `/dav/{uid}.ics` path scheme.
#[derive(Debug, Clone)]
pub struct DavPathScheme {
    prefix: String,
}

impl DavPathScheme {
    /// Creates a scheme with the given path prefix.
    #[must_use]
    pub fn new(prefix: impl Into<String>) -> Self {
        let mut prefix = prefix.into();
        while prefix.ends_with('/') {
            prefix.pop();
        }
        Self { prefix }
    }
}

impl Default for DavPathScheme {
    fn default() -> Self {
        Self::new(DEFAULT_DAV_PREFIX)
    }
}

impl HrefScheme for DavPathScheme {
    fn href_for(&self, uid: &str) -> Href {
        Href::new(format!("{}/{uid}.ics", self.prefix))
    }
}

use thiserror::Error;

/// Core-level errors
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Configuration error: {0}")]
    Config(String),
}

pub type CoreResult<T> = std::result::Result<T, CoreError>;

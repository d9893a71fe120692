//! Engine error types.

use sundial_rfc::rfc::dav::parse::ParseError;
use thiserror::Error;

/// An error decoding a stored calendar document.
///
/// Codec errors are handled per object: the engine logs and skips the
/// object rather than failing the query.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The stored document does not have the expected shape.
    #[error("malformed calendar document: {0}")]
    MalformedDocument(String),
}

/// An error from the calendar store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing store could not be reached or failed.
    #[error("store unavailable: {0}")]
    Unavailable(#[from] anyhow::Error),

    /// The store gave up on its own deadline.
    #[error("store timed out")]
    Timeout,
}

/// A query-fatal engine error.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The request body could not be parsed.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// The store failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The store did not answer within the engine's deadline.
    #[error("store timed out after {0}s")]
    StoreTimeout(u64),

    /// Response rendering failed.
    #[error("internal error: {0}")]
    Internal(String),
}

impl EngineError {
    /// Maps this error to the HTTP status the transport should send.
    #[must_use]
    pub const fn http_status(&self) -> u16 {
        match self {
            Self::Parse(_) => 400,
            Self::Store(StoreError::Unavailable(_)) => 502,
            Self::Store(StoreError::Timeout) | Self::StoreTimeout(_) => 503,
            Self::Internal(_) => 500,
        }
    }
}

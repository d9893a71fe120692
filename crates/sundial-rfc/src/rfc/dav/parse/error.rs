//! DAV XML parse error types.

use thiserror::Error;

/// Result type for DAV XML parsing.
pub type ParseResult<T> = Result<T, ParseError>;

/// An error that occurred while parsing a REPORT request body.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The body is not well-formed XML.
    #[error("invalid XML: {0}")]
    InvalidXml(String),

    /// A time-range element is invalid (bad timestamp, missing
    /// attribute, or start after end).
    #[error("invalid time-range: {0}")]
    InvalidTimeRange(String),

    /// The filter structure is not one this parser understands.
    #[error("unsupported filter: {0}")]
    UnsupportedFilter(String),

    /// The report root element names an unrecognized report type.
    #[error("unsupported report: {0}")]
    UnsupportedReport(String),

    /// Byte content could not be decoded as text.
    #[error("encoding error: {0}")]
    Encoding(String),
}

impl From<quick_xml::Error> for ParseError {
    fn from(err: quick_xml::Error) -> Self {
        Self::InvalidXml(err.to_string())
    }
}

impl From<quick_xml::events::attributes::AttrError> for ParseError {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        Self::InvalidXml(err.to_string())
    }
}

impl From<std::str::Utf8Error> for ParseError {
    fn from(err: std::str::Utf8Error) -> Self {
        Self::Encoding(err.to_string())
    }
}

impl From<quick_xml::encoding::EncodingError> for ParseError {
    fn from(err: quick_xml::encoding::EncodingError) -> Self {
        Self::Encoding(err.to_string())
    }
}

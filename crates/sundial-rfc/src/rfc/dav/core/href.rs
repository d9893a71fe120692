//! DAV href type.

use std::fmt;

/// A `WebDAV` href (URL reference).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Href(pub String);

impl Href {
    /// Creates a new href.
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    /// Returns the href as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the last path segment (resource name).
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        let path = self.0.trim_end_matches('/');
        path.rsplit('/').next()
    }
}

impl fmt::Display for Href {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for Href {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for Href {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

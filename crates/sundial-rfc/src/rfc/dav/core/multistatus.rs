//! Multistatus response types.

use super::href::Href;
use super::property::DavProperty;

/// A multistatus response (RFC 4918 §13).
///
/// Built append-only, one entry per matched object, and serialized
/// exactly once.
#[derive(Debug, Clone, Default)]
pub struct Multistatus {
    /// Individual responses.
    pub responses: Vec<PropstatResponse>,
}

impl Multistatus {
    /// Creates an empty multistatus.
    #[must_use]
    pub fn new() -> Self {
        Self {
            responses: Vec::new(),
        }
    }

    /// Adds a response.
    pub fn add_response(&mut self, response: PropstatResponse) {
        self.responses.push(response);
    }

    /// Returns true if empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.responses.is_empty()
    }
}

/// A single response within a multistatus.
#[derive(Debug, Clone)]
pub struct PropstatResponse {
    /// The resource href.
    pub href: Href,
    /// Property statuses grouped by status code.
    pub propstats: Vec<Propstat>,
}

impl PropstatResponse {
    /// Creates a simple 200 OK response with properties.
    #[must_use]
    pub fn ok(href: impl Into<Href>, properties: Vec<DavProperty>) -> Self {
        Self {
            href: href.into(),
            propstats: vec![Propstat {
                status: Status::Ok,
                properties,
            }],
        }
    }

    /// Creates a response with found and not-found properties.
    ///
    /// Resolved properties land in a 200 group, unresolved ones in a
    /// separate 404 group, per RFC 4918's propstat convention.
    #[must_use]
    pub fn with_found_and_not_found(
        href: impl Into<Href>,
        found: Vec<DavProperty>,
        not_found: Vec<DavProperty>,
    ) -> Self {
        let mut propstats = Vec::new();

        if !found.is_empty() {
            propstats.push(Propstat {
                status: Status::Ok,
                properties: found,
            });
        }

        if !not_found.is_empty() {
            propstats.push(Propstat {
                status: Status::NotFound,
                properties: not_found,
            });
        }

        Self {
            href: href.into(),
            propstats,
        }
    }
}

/// Property status grouping.
#[derive(Debug, Clone)]
pub struct Propstat {
    /// HTTP status.
    pub status: Status,
    /// Properties with this status.
    pub properties: Vec<DavProperty>,
}

/// HTTP status for propstat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// 200 OK
    Ok,
    /// 404 Not Found
    NotFound,
    /// Custom status
    Custom(u16),
}

impl Status {
    /// Returns the status code.
    #[must_use]
    pub const fn code(&self) -> u16 {
        match self {
            Self::Ok => 200,
            Self::NotFound => 404,
            Self::Custom(code) => *code,
        }
    }

    /// Returns the status line.
    #[must_use]
    pub fn status_line(&self) -> String {
        format!("HTTP/1.1 {} {}", self.code(), self.reason_phrase())
    }

    /// Returns the reason phrase.
    #[must_use]
    pub const fn reason_phrase(&self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::NotFound => "Not Found",
            Self::Custom(_) => "Unknown",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rfc::dav::core::namespace::QName;

    #[test]
    fn multistatus_new() {
        let ms = Multistatus::new();
        assert!(ms.is_empty());
    }

    #[test]
    fn propstat_response_ok() {
        let resp = PropstatResponse::ok(
            "/dav/abc123.ics",
            vec![DavProperty::text(QName::dav("getetag"), "\"x\"")],
        );
        assert_eq!(resp.propstats.len(), 1);
        assert_eq!(resp.propstats[0].status, Status::Ok);
    }

    #[test]
    fn propstat_response_with_not_found() {
        let resp = PropstatResponse::with_found_and_not_found(
            "/dav/abc123.ics",
            vec![DavProperty::text(QName::dav("getetag"), "\"x\"")],
            vec![DavProperty::not_found(QName::dav("displayname"))],
        );
        assert_eq!(resp.propstats.len(), 2);
        assert_eq!(resp.propstats[1].status, Status::NotFound);
    }

    #[test]
    fn status_line() {
        assert_eq!(Status::Ok.status_line(), "HTTP/1.1 200 OK");
        assert_eq!(Status::NotFound.status_line(), "HTTP/1.1 404 Not Found");
    }
}

//! RFC protocol types for Sundial: WebDAV multistatus (RFC 4918),
//! CalDAV calendar-query (RFC 4791), and iCalendar (RFC 5545).

pub mod rfc;

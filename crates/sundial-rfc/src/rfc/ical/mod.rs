//! iCalendar (RFC 5545) types and serialization.

pub mod build;
pub mod core;

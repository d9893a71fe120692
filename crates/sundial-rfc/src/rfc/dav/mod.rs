//! `WebDAV`/CalDAV XML handling: core types, request parsing, response building.

pub mod build;
pub mod core;
pub mod parse;

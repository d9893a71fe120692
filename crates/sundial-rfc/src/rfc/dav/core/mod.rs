//! `WebDAV` XML types.
//!
//! This module defines the core types for `WebDAV` XML elements
//! used in REPORT requests and multistatus responses.

mod href;
mod multistatus;
mod namespace;
mod property;
mod query;

pub use href::Href;
pub use multistatus::{Multistatus, Propstat, PropstatResponse, Status};
pub use namespace::{CALDAV_NS, DAV_NS, Namespace, QName};
pub use property::{DavProperty, PropertyValue};
pub use query::{QueryFilter, ReportRequest, TimeRange};

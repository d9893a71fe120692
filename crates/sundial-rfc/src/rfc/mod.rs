//! Wire formats: `WebDAV` XML and iCalendar text.

pub mod dav;
pub mod ical;

//! Core iCalendar data model.

mod component;
mod datetime;
mod parameter;
mod property;

pub use component::{Component, ComponentKind, ICalendar};
pub use datetime::{format_utc_basic, parse_utc_timestamp};
pub use parameter::Parameter;
pub use property::{Property, Value};

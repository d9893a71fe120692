//! REPORT request body parsing.

mod error;
mod report;

pub use error::{ParseError, ParseResult};
pub use report::{ReportParser, ReportRegistry, parse_calendar_query, parse_report};

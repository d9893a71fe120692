//! CalDAV calendar-query REPORT engine.
//!
//! Composes the report parser, a pluggable calendar store, the
//! JSON-to-iCalendar codec, and the multistatus builder into one
//! request pipeline: parse, fetch, decode, render.

pub mod codec;
pub mod engine;
pub mod error;
pub mod href;
pub mod resolver;
pub mod store;

pub use engine::{QueryEngine, QueryOutcome};
pub use error::{CodecError, EngineError, StoreError};
pub use store::{CalendarObject, CalendarStore};

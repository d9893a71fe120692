//! Parsed calendar-query report structures.

use chrono::{DateTime, Utc};

use super::namespace::QName;
use crate::rfc::ical::core::ComponentKind;

/// A parsed REPORT request.
#[derive(Debug, Clone, PartialEq)]
pub enum ReportRequest {
    /// A `calendar-query` report (RFC 4791 §7.8).
    CalendarQuery(QueryFilter),
}

/// The normalized form of a `calendar-query` request body.
///
/// The nested comp-filter structure from the wire collapses into the
/// innermost component kind; the outer `VCALENDAR` filter carries no
/// information of its own.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryFilter {
    /// The component kind being queried.
    pub component: ComponentKind,
    /// Optional time-range constraint.
    pub time_range: Option<TimeRange>,
    /// Requested properties, in request order.
    pub properties: Vec<QName>,
}

impl QueryFilter {
    /// Creates a filter with no time range and no requested properties.
    #[must_use]
    pub fn for_component(component: ComponentKind) -> Self {
        Self {
            component,
            time_range: None,
            properties: Vec::new(),
        }
    }
}

/// A half-open UTC time range `[start, end)`.
///
/// Invariant: `start <= end`, enforced at parse time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    /// Inclusive start.
    pub start: DateTime<Utc>,
    /// Exclusive end.
    pub end: DateTime<Utc>,
}

impl TimeRange {
    /// Returns true when an event spanning `[dtstart, dtend)` overlaps
    /// this range.
    ///
    /// An instantaneous event (`dtstart == dtend`) overlaps when it
    /// falls inside the range.
    #[must_use]
    pub fn overlaps(&self, dtstart: DateTime<Utc>, dtend: DateTime<Utc>) -> bool {
        if dtstart == dtend {
            return self.start <= dtstart && dtstart < self.end;
        }
        dtstart < self.end && dtend > self.start
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn utc(y: i32, mo: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, 0, 0).unwrap()
    }

    #[test]
    fn overlap_partial() {
        let range = TimeRange {
            start: utc(2024, 1, 10, 0),
            end: utc(2024, 1, 20, 0),
        };
        assert!(range.overlaps(utc(2024, 1, 5, 0), utc(2024, 1, 12, 0)));
        assert!(range.overlaps(utc(2024, 1, 15, 0), utc(2024, 1, 25, 0)));
    }

    #[test]
    fn no_overlap_when_touching_boundary() {
        let range = TimeRange {
            start: utc(2024, 1, 10, 0),
            end: utc(2024, 1, 20, 0),
        };
        // Event ends exactly at range start: half-open semantics, no match.
        assert!(!range.overlaps(utc(2024, 1, 5, 0), utc(2024, 1, 10, 0)));
        // Event starts exactly at range end: no match.
        assert!(!range.overlaps(utc(2024, 1, 20, 0), utc(2024, 1, 25, 0)));
    }

    #[test]
    fn instantaneous_event() {
        let range = TimeRange {
            start: utc(2024, 1, 10, 0),
            end: utc(2024, 1, 20, 0),
        };
        assert!(range.overlaps(utc(2024, 1, 10, 0), utc(2024, 1, 10, 0)));
        assert!(!range.overlaps(utc(2024, 1, 20, 0), utc(2024, 1, 20, 0)));
    }
}

//! iCalendar date-time parsing and formatting (RFC 5545 §3.3.5).

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};

/// Parses a UTC timestamp from its iCalendar or RFC 3339 form.
///
/// Accepted forms, tried in order:
/// - `YYYYMMDDTHHMMSSZ` (iCalendar UTC)
/// - `YYYYMMDDTHHMMSS` (iCalendar floating, interpreted as UTC)
/// - `YYYYMMDD` (date only, midnight UTC)
/// - RFC 3339 (e.g. `2024-01-15T10:00:00Z`)
///
/// Returns `None` for anything else.
#[must_use]
pub fn parse_utc_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();

    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y%m%dT%H%M%SZ") {
        return Some(Utc.from_utc_datetime(&naive));
    }

    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y%m%dT%H%M%S") {
        return Some(Utc.from_utc_datetime(&naive));
    }

    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y%m%d") {
        return Some(Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0)?));
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    None
}

/// Formats a UTC timestamp in iCalendar basic form (`YYYYMMDDTHHMMSSZ`).
#[must_use]
pub fn format_utc_basic(dt: DateTime<Utc>) -> String {
    dt.format("%Y%m%dT%H%M%SZ").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn parse_basic_utc() {
        let dt = parse_utc_timestamp("20240115T100000Z").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2024, 1, 15, 10, 0, 0).unwrap());
    }

    #[test]
    fn parse_floating_as_utc() {
        let dt = parse_utc_timestamp("20240115T100000").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2024, 1, 15, 10, 0, 0).unwrap());
    }

    #[test]
    fn parse_date_only() {
        let dt = parse_utc_timestamp("20240115").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap());
    }

    #[test]
    fn parse_rfc3339() {
        let dt = parse_utc_timestamp("2024-01-15T10:00:00+02:00").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2024, 1, 15, 8, 0, 0).unwrap());
    }

    #[test]
    fn parse_garbage() {
        assert!(parse_utc_timestamp("not-a-date").is_none());
        assert!(parse_utc_timestamp("").is_none());
        assert!(parse_utc_timestamp("20241340T990000Z").is_none());
    }

    #[test]
    fn format_roundtrip() {
        let dt = Utc.with_ymd_and_hms(2024, 1, 15, 10, 0, 0).unwrap();
        assert_eq!(format_utc_basic(dt), "20240115T100000Z");
        assert_eq!(parse_utc_timestamp(&format_utc_basic(dt)), Some(dt));
    }
}

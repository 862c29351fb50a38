//! Timestamp parsing and display formatting for list screens.
//!
//! Backend records carry creation timestamps in a handful of shapes
//! (RFC 3339 with or without offset, plain dates, epoch numbers). Every
//! list screen sorts by them, so parsing must never panic: anything
//! unreadable becomes epoch 0 and keeps comparisons total.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};

/// Display format used in table cells, e.g. `02/01/2024 15:04`.
const DISPLAY_FORMAT: &str = "%d/%m/%Y %H:%M";

/// Parse a backend timestamp string into epoch milliseconds (UTC).
///
/// Tries RFC 3339 first, then common offset-less fallbacks. Returns `None`
/// when nothing matches.
pub fn parse_timestamp_millis(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc).timestamp_millis());
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc().timestamp_millis());
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date.and_hms_opt(0, 0, 0)?.and_utc().timestamp_millis());
    }

    None
}

/// Format epoch milliseconds for display in a table cell.
pub fn format_display(ts_millis: i64) -> String {
    match Utc.timestamp_millis_opt(ts_millis).single() {
        Some(dt) => dt.format(DISPLAY_FORMAT).to_string(),
        None => String::new(),
    }
}

/// Whether two epoch-millisecond timestamps fall on the same UTC calendar
/// day. Used for the "new today" badge on list screens.
pub fn same_utc_day(a_millis: i64, b_millis: i64) -> bool {
    match (
        Utc.timestamp_millis_opt(a_millis).single(),
        Utc.timestamp_millis_opt(b_millis).single(),
    ) {
        (Some(a), Some(b)) => a.date_naive() == b.date_naive(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rfc3339() {
        let ts = parse_timestamp_millis("2024-02-01T10:30:00.000Z").unwrap();
        assert_eq!(ts, 1706783400000);
    }

    #[test]
    fn test_parse_rfc3339_with_offset() {
        let utc = parse_timestamp_millis("2024-02-01T10:30:00Z").unwrap();
        let offset = parse_timestamp_millis("2024-02-01T12:30:00+02:00").unwrap();
        assert_eq!(utc, offset);
    }

    #[test]
    fn test_parse_naive_datetime() {
        let ts = parse_timestamp_millis("2024-02-01 10:30:00").unwrap();
        assert_eq!(ts, 1706783400000);
    }

    #[test]
    fn test_parse_plain_date() {
        let ts = parse_timestamp_millis("2024-02-01").unwrap();
        assert_eq!(ts, 1706745600000);
    }

    #[test]
    fn test_parse_garbage_is_none() {
        assert_eq!(parse_timestamp_millis("yesterday"), None);
        assert_eq!(parse_timestamp_millis(""), None);
        assert_eq!(parse_timestamp_millis("   "), None);
    }

    #[test]
    fn test_format_display() {
        assert_eq!(format_display(1706783400000), "01/02/2024 10:30");
    }

    #[test]
    fn test_same_utc_day() {
        let morning = parse_timestamp_millis("2024-02-01T00:10:00Z").unwrap();
        let night = parse_timestamp_millis("2024-02-01T23:50:00Z").unwrap();
        let next = parse_timestamp_millis("2024-02-02T00:10:00Z").unwrap();

        assert!(same_utc_day(morning, night));
        assert!(!same_utc_day(night, next));
    }
}

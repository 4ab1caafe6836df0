//! Parsing and display of server timestamps.
//!
//! The backend serializes datetimes as RFC 2822 (`Tue, 02 Jan 2024 08:30:00 GMT`)
//! when they come from the database and as RFC 3339 when the client sent them.
//! Naive `YYYY-MM-DD HH:MM:SS` values are taken to be UTC.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, SecondsFormat, Utc};

const NAIVE_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}

/// UTC calendar day of a timestamp.
pub fn utc_day(raw: &str) -> Option<NaiveDate> {
    parse_timestamp(raw).map(|dt| dt.date_naive())
}

/// Local-time rendering used by every view. Unparseable input is shown as-is.
pub fn display(raw: &str) -> String {
    match parse_timestamp(raw) {
        Some(dt) => dt
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M:%S")
            .to_string(),
        None => raw.to_string(),
    }
}

/// `Hh Mm` when at least an hour elapsed, else `Mm`. `None` when either end
/// is missing or unparseable, or the end precedes the start.
pub fn format_duration(start: Option<&str>, end: Option<&str>) -> Option<String> {
    let start = parse_timestamp(start?)?;
    let end = parse_timestamp(end?)?;
    let minutes = (end - start).num_minutes();
    if minutes < 0 {
        return None;
    }
    let (hours, mins) = (minutes / 60, minutes % 60);
    Some(if hours > 0 {
        format!("{}h {}m", hours, mins)
    } else {
        format!("{}m", mins)
    })
}

/// Current time as ISO-8601 UTC with millisecond precision.
pub fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn parses_rfc2822_from_flask() {
        let dt = parse_timestamp("Tue, 02 Jan 2024 08:30:00 GMT").unwrap();
        assert_eq!((dt.year(), dt.month(), dt.day()), (2024, 1, 2));
        assert_eq!(dt.hour(), 8);
    }

    #[test]
    fn parses_rfc3339_with_offset() {
        let dt = parse_timestamp("2024-01-02T01:30:00+05:00").unwrap();
        assert_eq!(dt.day(), 1);
        assert_eq!(dt.hour(), 20);
    }

    #[test]
    fn parses_naive_as_utc() {
        let dt = parse_timestamp("2024-03-10 23:59:59").unwrap();
        assert_eq!(dt.hour(), 23);
        assert_eq!(utc_day("2024-03-10 23:59:59"), NaiveDate::from_ymd_opt(2024, 3, 10));
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_timestamp("").is_none());
        assert!(parse_timestamp("yesterday").is_none());
        assert_eq!(display("yesterday"), "yesterday");
    }

    #[test]
    fn duration_formats_hours_and_minutes() {
        assert_eq!(
            format_duration(Some("2024-01-01 08:00:00"), Some("2024-01-01 10:05:30")),
            Some("2h 5m".to_string())
        );
        assert_eq!(
            format_duration(Some("2024-01-01 08:00:00"), Some("2024-01-01 08:45:00")),
            Some("45m".to_string())
        );
    }

    #[test]
    fn duration_needs_both_ends_in_order() {
        assert!(format_duration(Some("2024-01-01 08:00:00"), None).is_none());
        assert!(format_duration(Some("2024-01-01 09:00:00"), Some("2024-01-01 08:00:00")).is_none());
    }

    #[test]
    fn now_iso_has_millis_and_z() {
        let now = now_iso();
        assert!(now.ends_with('Z'));
        assert_eq!(now.len(), "2024-01-01T00:00:00.000Z".len());
    }
}

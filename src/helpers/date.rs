//! Date helper functions

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref DATE_PREFIX: Regex = Regex::new(r"^\d{4}-\d{2}-\d{2}").unwrap();
}

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y/%m/%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%Y.%m.%d"];

/// Parse a front-matter date string in various formats, interpreted as UTC
pub fn parse_date_string(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    // RFC 3339 / ISO 8601 with offset
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.and_utc());
        }
    }

    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d.and_hms_opt(0, 0, 0)?.and_utc());
        }
    }

    None
}

/// Calendar date of a front-matter date string, as written
///
/// An explicit offset is not applied, so `2024-01-16T01:00:00+09:00` is
/// still the 16th.
pub fn parse_calendar_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }

    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
}

/// Leading `YYYY-MM-DD` of a string, if present
pub fn date_prefix(s: &str) -> Option<&str> {
    DATE_PREFIX.find(s).map(|m| m.as_str())
}

/// Format as `YYYY-MM-DD`
pub fn format_ymd(date: &DateTime<Utc>) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Format for RSS `<pubDate>` (RFC 822, always GMT)
pub fn format_rfc822(date: &DateTime<Utc>) -> String {
    date.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_date_only() {
        let dt = parse_date_string("2024-03-01").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap());
        assert!(parse_date_string("2024/03/01").is_some());
    }

    #[test]
    fn test_parse_datetime() {
        let dt = parse_date_string("2024-01-15 10:30:00").unwrap();
        assert_eq!(format_ymd(&dt), "2024-01-15");

        let dt = parse_date_string("2024-01-15T23:30:00+09:00").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2024, 1, 15, 14, 30, 0).unwrap());
    }

    #[test]
    fn test_calendar_date_ignores_offset() {
        let date = parse_calendar_date("2024-01-16T01:00:00+09:00").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 1, 16).unwrap());
        assert_eq!(
            parse_calendar_date("2024/05/06 09:30"),
            NaiveDate::from_ymd_opt(2024, 5, 6)
        );
        assert!(parse_calendar_date("someday").is_none());
    }

    #[test]
    fn test_parse_invalid() {
        assert!(parse_date_string("").is_none());
        assert!(parse_date_string("last tuesday").is_none());
        assert!(parse_date_string("2024-13-45").is_none());
    }

    #[test]
    fn test_date_prefix() {
        assert_eq!(date_prefix("2024-03-01-my-post"), Some("2024-03-01"));
        assert_eq!(date_prefix("my-post-2024-03-01"), None);
    }

    #[test]
    fn test_format_rfc822() {
        let dt = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        assert_eq!(format_rfc822(&dt), "Fri, 01 Mar 2024 00:00:00 GMT");
    }
}

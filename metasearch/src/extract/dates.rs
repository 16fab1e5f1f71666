//! Publication date normalization.
//!
//! Providers send Unix seconds or milliseconds, RFC 3339, RFC 2822 (RSS
//! `pubDate`), plain dates, and a handful of human formats. All of them are
//! normalized to `YYYY-MM-DDTHH:MM:SSZ`.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};

/// Unix values above this are milliseconds.
const MILLISECOND_CUTOFF: f64 = 100_000_000_000.0;

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%b %d, %Y %H:%M:%S",
    "%B %d, %Y %H:%M:%S",
];

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%B %d, %Y",
    "%b %d, %Y",
    "%d %B %Y",
    "%d %b %Y",
    "%b %d %Y",
    "%m/%d/%Y",
    "%Y%m%d",
];

/// Parses a provider timestamp into UTC.
#[must_use]
pub fn parse_published(raw: &str) -> Option<DateTime<Utc>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    // compact `YYYYMMDD` would otherwise read as Unix seconds
    if trimmed.len() != 8 || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        if let Ok(num) = trimmed.parse::<f64>() {
            return parse_unix(num);
        }
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(trimmed) {
        return Some(dt.with_timezone(&Utc));
    }
    // offsets without a colon, e.g. `2024-03-01T10:00:00+0100`
    if let Ok(dt) = DateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%z") {
        return Some(dt.with_timezone(&Utc));
    }

    let naive = trimmed.trim_end_matches('Z');
    for fmt in NAIVE_DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(naive, fmt) {
            return Some(Utc.from_utc_datetime(&dt));
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, fmt) {
            return date
                .and_hms_opt(0, 0, 0)
                .map(|dt| Utc.from_utc_datetime(&dt));
        }
    }

    None
}

/// Normalizes a provider timestamp to `YYYY-MM-DDTHH:MM:SSZ`.
///
/// Unparseable input yields `None`, never a placeholder date.
#[must_use]
pub fn normalize_published(raw: &str) -> Option<String> {
    parse_published(raw).map(|dt| format_published(&dt))
}

/// Formats a UTC time as `YYYY-MM-DDTHH:MM:SSZ`.
#[must_use]
pub fn format_published(dt: &DateTime<Utc>) -> String {
    dt.format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

#[allow(clippy::cast_possible_truncation)]
fn parse_unix(value: f64) -> Option<DateTime<Utc>> {
    if !value.is_finite() || value <= 0.0 {
        return None;
    }
    if value > MILLISECOND_CUTOFF {
        Utc.timestamp_millis_opt(value as i64).single()
    } else {
        Utc.timestamp_opt(value.trunc() as i64, 0).single()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unix_seconds_and_millis() {
        assert_eq!(
            normalize_published("1696512000").as_deref(),
            Some("2023-10-05T13:20:00Z")
        );
        assert_eq!(
            normalize_published("1696512000000").as_deref(),
            Some("2023-10-05T13:20:00Z")
        );
    }

    #[test]
    fn test_rfc3339_with_offset() {
        assert_eq!(
            normalize_published("2024-03-01T10:00:00+02:00").as_deref(),
            Some("2024-03-01T08:00:00Z")
        );
        assert_eq!(
            normalize_published("2024-03-01T10:00:00.123Z").as_deref(),
            Some("2024-03-01T10:00:00Z")
        );
        assert_eq!(
            normalize_published("2024-03-01T10:00:00+0100").as_deref(),
            Some("2024-03-01T09:00:00Z")
        );
    }

    #[test]
    fn test_rss_pub_date() {
        assert_eq!(
            normalize_published("Tue, 05 Mar 2024 14:30:00 GMT").as_deref(),
            Some("2024-03-05T14:30:00Z")
        );
    }

    #[test]
    fn test_date_only_and_human() {
        assert_eq!(
            normalize_published("2024-03-05").as_deref(),
            Some("2024-03-05T00:00:00Z")
        );
        assert_eq!(
            normalize_published("March 5, 2024").as_deref(),
            Some("2024-03-05T00:00:00Z")
        );
        assert_eq!(
            normalize_published("5 Mar 2024").as_deref(),
            Some("2024-03-05T00:00:00Z")
        );
        assert_eq!(
            normalize_published("20240305").as_deref(),
            Some("2024-03-05T00:00:00Z")
        );
        assert_eq!(
            normalize_published("2024-03-05 08:15:00").as_deref(),
            Some("2024-03-05T08:15:00Z")
        );
    }

    #[test]
    fn test_unparseable_is_none() {
        assert_eq!(normalize_published(""), None);
        assert_eq!(normalize_published("yesterday"), None);
        assert_eq!(normalize_published("-5"), None);
        assert_eq!(normalize_published("2024-13-45"), None);
    }
}

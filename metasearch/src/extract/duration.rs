//! Duration normalization to canonical `H:MM:SS` / `M:SS` text.

use std::sync::LazyLock;

use regex::Regex;

/// Bare integers above this are read as milliseconds.
pub const DEFAULT_MILLISECOND_THRESHOLD: u64 = 1_000_000;

static CANONICAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{1,2}:\d{2}(:\d{2})?$").expect("Invalid regex"));

static COLON: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+):(\d{1,2})(?::(\d{1,2}))?$").expect("Invalid regex")
});

static ISO_8601: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^P(?:(\d+)D)?(?:T(?:(\d+)H)?(?:(\d+)M)?(?:(\d+(?:\.\d+)?)S)?)?$")
        .expect("Invalid regex")
});

static NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+(?:\.\d+)?$").expect("Invalid regex"));

/// A duration as providers send it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RawDuration<'a> {
    /// Text: canonical, ISO-8601, or a bare number.
    Text(&'a str),
    /// A number of seconds, or milliseconds above the threshold.
    Number(f64),
    /// No duration supplied.
    Missing,
}

impl<'a> From<&'a str> for RawDuration<'a> {
    fn from(value: &'a str) -> Self {
        Self::Text(value)
    }
}

impl<'a> From<&'a String> for RawDuration<'a> {
    fn from(value: &'a String) -> Self {
        Self::Text(value)
    }
}

impl<'a> From<Option<&'a str>> for RawDuration<'a> {
    fn from(value: Option<&'a str>) -> Self {
        value.map_or(Self::Missing, Self::Text)
    }
}

impl From<u64> for RawDuration<'_> {
    #[allow(clippy::cast_precision_loss)]
    fn from(value: u64) -> Self {
        Self::Number(value as f64)
    }
}

impl From<i64> for RawDuration<'_> {
    #[allow(clippy::cast_precision_loss)]
    fn from(value: i64) -> Self {
        Self::Number(value as f64)
    }
}

impl From<f64> for RawDuration<'_> {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl<'a> From<&'a serde_json::Value> for RawDuration<'a> {
    fn from(value: &'a serde_json::Value) -> Self {
        match value {
            serde_json::Value::String(s) => Self::Text(s),
            serde_json::Value::Number(n) => n.as_f64().map_or(Self::Missing, Self::Number),
            _ => Self::Missing,
        }
    }
}

/// Normalizes a duration to `H:MM:SS` (an hour or more) or `M:SS`.
///
/// Attempts, in order: canonical colon text (returned as-is), other colon
/// text, ISO-8601 (`PT1H2M3S`), a bare number (milliseconds when above
/// [`DEFAULT_MILLISECOND_THRESHOLD`], seconds otherwise). Missing,
/// unparseable or out-of-range input yields `""`.
#[must_use]
pub fn normalize_duration<'a>(raw: impl Into<RawDuration<'a>>) -> String {
    normalize_duration_with(raw, DEFAULT_MILLISECOND_THRESHOLD)
}

/// [`normalize_duration`] with a custom millisecond threshold.
#[must_use]
pub fn normalize_duration_with<'a>(raw: impl Into<RawDuration<'a>>, ms_threshold: u64) -> String {
    let seconds = match raw.into() {
        RawDuration::Missing => None,
        RawDuration::Number(n) => number_seconds(n, ms_threshold),
        RawDuration::Text(text) => {
            let text = text.trim();
            if CANONICAL.is_match(text) {
                return text.to_string();
            }
            colon_seconds(text)
                .or_else(|| iso_seconds(text))
                .or_else(|| {
                    NUMBER
                        .is_match(text)
                        .then(|| text.parse::<f64>().ok())
                        .flatten()
                        .and_then(|n| number_seconds(n, ms_threshold))
                })
        }
    };

    seconds.map_or_else(String::new, format_seconds)
}

/// Formats whole seconds.
#[must_use]
pub fn format_seconds(total: u64) -> String {
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;
    if hours > 0 {
        format!("{hours}:{minutes:02}:{seconds:02}")
    } else {
        format!("{minutes}:{seconds:02}")
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
fn number_seconds(n: f64, ms_threshold: u64) -> Option<u64> {
    if !n.is_finite() || n < 0.0 {
        return None;
    }
    let seconds = if n > ms_threshold as f64 { n / 1000.0 } else { n };
    let seconds = seconds.floor();
    (seconds < u64::MAX as f64).then(|| seconds as u64)
}

fn colon_seconds(text: &str) -> Option<u64> {
    let caps = COLON.captures(text)?;
    let first: u64 = caps[1].parse().ok()?;
    let second: u64 = caps[2].parse().ok()?;
    match caps.get(3) {
        Some(third) => {
            let third: u64 = third.as_str().parse().ok()?;
            first
                .checked_mul(3600)?
                .checked_add(second * 60)?
                .checked_add(third)
        }
        None => first.checked_mul(60)?.checked_add(second),
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
fn iso_seconds(text: &str) -> Option<u64> {
    let caps = ISO_8601.captures(text)?;
    if (1..=4).all(|i| caps.get(i).is_none()) {
        return None;
    }
    let part = |i: usize, unit: u64| -> Option<u64> {
        caps.get(i)
            .map_or(Some(0), |m| m.as_str().parse::<u64>().ok())?
            .checked_mul(unit)
    };
    let seconds = match caps.get(4) {
        Some(m) => {
            let s = m.as_str().parse::<f64>().ok()?.floor();
            if s >= u64::MAX as f64 {
                return None;
            }
            s as u64
        }
        None => 0,
    };
    part(1, 86_400)?
        .checked_add(part(2, 3600)?)?
        .checked_add(part(3, 60)?)?
        .checked_add(seconds)
}

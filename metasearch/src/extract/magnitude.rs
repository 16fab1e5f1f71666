//! Human-readable count parsing ("50K", "2.5M views", "1,234").

use std::sync::LazyLock;

use regex::Regex;

static MAGNITUDE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(\d+(?:\.\d+)?)\s*(thousand|million|billion|mn|bn|k|m|b)?\b")
        .expect("Invalid regex")
});

/// Parses a leading count with an optional `k`/`m`/`b` suffix.
///
/// Thousands separators and whitespace between digits are stripped first.
/// Unparseable input yields `0`; use [`parse_magnitude_opt`] when absence
/// must stay distinguishable from zero.
#[must_use]
pub fn parse_magnitude(text: &str) -> u64 {
    parse_magnitude_opt(text).unwrap_or(0)
}

/// Like [`parse_magnitude`], but `None` when no count is present.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn parse_magnitude_opt(text: &str) -> Option<u64> {
    let compact = strip_separators(text.trim());
    let caps = MAGNITUDE.captures(&compact)?;
    let value: f64 = caps[1].parse().ok()?;
    let multiplier = caps.get(2).map_or(1.0, |suffix| {
        match suffix.as_str().to_ascii_lowercase().as_str() {
            "k" | "thousand" => 1e3,
            "m" | "mn" | "million" => 1e6,
            "b" | "bn" | "billion" => 1e9,
            _ => 1.0,
        }
    });
    Some((value * multiplier).round() as u64)
}

/// Removes `,`, `'`, `_` and whitespace that sit between two digits.
fn strip_separators(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    for (i, &c) in chars.iter().enumerate() {
        let separator = matches!(c, ',' | '\'' | '_') || c.is_whitespace();
        if separator {
            let before = i > 0 && chars[i - 1].is_ascii_digit();
            let after = chars.get(i + 1).is_some_and(char::is_ascii_digit);
            if before && after {
                continue;
            }
        }
        out.push(c);
    }
    out
}

//! Assertions for adapter output.

use crate::core::{EngineResults, SearchResult};
use crate::extract::parse_published;

/// Asserts that `value` is a canonical `M:SS` or `H:MM:SS` duration.
pub fn assert_canonical_duration(value: &str) {
    let parts: Vec<&str> = value.split(':').collect();
    let well_formed = matches!(parts.len(), 2 | 3)
        && parts.iter().all(|p| !p.is_empty() && p.bytes().all(|b| b.is_ascii_digit()))
        && parts[1..].iter().all(|p| p.len() == 2 && p.as_bytes()[0] < b'6');
    assert!(well_formed, "Expected canonical duration, got '{value}'");
}

/// Asserts that a single result satisfies the normalized schema.
pub fn assert_result_valid(result: &SearchResult) {
    assert!(
        result.url.starts_with("http://")
            || result.url.starts_with("https://")
            || result.url.starts_with("//"),
        "Expected an absolute URL, got '{}'",
        result.url
    );
    assert!(
        !result.title.is_empty() && result.title.trim() == result.title,
        "Expected a trimmed non-empty title, got '{}'",
        result.title
    );
    assert_eq!(result.content.trim(), result.content, "Content is not trimmed");
    assert!(!result.engine.is_empty(), "Result has no engine name");
    assert!(result.score.is_finite(), "Score is not finite: {}", result.score);
    if let Some(duration) = &result.duration {
        assert_canonical_duration(duration);
    }
    if let Some(published) = &result.published_at {
        assert!(
            published.ends_with('Z') && parse_published(published).is_some(),
            "Expected a UTC timestamp, got '{published}'"
        );
    }
}

/// Asserts that every result satisfies the normalized schema.
pub fn assert_results_valid(results: &EngineResults) {
    for result in &results.results {
        assert_result_valid(result);
    }
}

/// Asserts the result URLs, in order.
pub fn assert_result_urls(results: &EngineResults, expected: &[&str]) {
    let actual = results.urls();
    assert_eq!(
        actual, expected,
        "Expected result URLs {expected:?}, got {actual:?}"
    );
}

/// Asserts that nothing at all was produced.
pub fn assert_empty_results(results: &EngineResults) {
    assert!(
        results.is_empty(),
        "Expected empty results, got {} results, suggestions {:?}",
        results.len(),
        results.suggestions
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_durations() {
        for value in ["0:05", "4:13", "59:59", "1:02:03", "12:00:00"] {
            assert_canonical_duration(value);
        }
    }

    #[test]
    #[should_panic(expected = "Expected canonical duration")]
    fn test_rejects_unpadded_seconds() {
        assert_canonical_duration("4:3");
    }

    #[test]
    #[should_panic(expected = "Expected canonical duration")]
    fn test_rejects_iso_text() {
        assert_canonical_duration("PT4M13S");
    }

    #[test]
    fn test_empty_results() {
        assert_empty_results(&EngineResults::new());
    }
}

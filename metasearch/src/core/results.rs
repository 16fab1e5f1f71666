//! Per-call adapter output.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::result::SearchResult;

/// Everything an adapter returns from one `parse_response` call.
///
/// `results` keeps source order, which is the provider's relevance order.
/// An empty value is a successful outcome, not a failure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineResults {
    /// Normalized results in relevance order.
    #[serde(default)]
    pub results: Vec<SearchResult>,
    /// Query suggestions.
    #[serde(default)]
    pub suggestions: Vec<String>,
    /// Spelling corrections.
    #[serde(default)]
    pub corrections: Vec<String>,
    /// Side channel for multi-phase protocols.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub engine_data: HashMap<String, serde_json::Value>,
}

impl EngineResults {
    /// Creates an empty value.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a value holding only results.
    #[must_use]
    pub fn with_results(results: Vec<SearchResult>) -> Self {
        Self {
            results,
            ..Self::default()
        }
    }

    /// Adds an engine data entry.
    #[must_use]
    pub fn with_engine_data(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.engine_data.insert(key.into(), value);
        self
    }

    /// Whether nothing at all was produced.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
            && self.suggestions.is_empty()
            && self.corrections.is_empty()
            && self.engine_data.is_empty()
    }

    /// Number of results.
    #[must_use]
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// Result URLs in order.
    #[must_use]
    pub fn urls(&self) -> Vec<&str> {
        self.results.iter().map(|r| r.url.as_str()).collect()
    }
}

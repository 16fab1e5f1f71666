//! Per-engine locale tables.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The locale meaning "no preference".
pub const ALL_LOCALE: &str = "all";

fn default_all_locale() -> String {
    ALL_LOCALE.to_string()
}

/// Maps query locales to the language and region codes one provider expects.
///
/// Providers spell locales differently (`lang_de`, `de-de`, `wt-wt`), so
/// each adapter carries its own tables and looks codes up with a fallback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineTraits {
    /// The provider's own code for "every region" (`wt-wt`, `clear`, `ZZ`).
    #[serde(default = "default_all_locale")]
    pub all_locale: String,
    /// Query locale to provider language code.
    #[serde(default)]
    pub languages: HashMap<String, String>,
    /// Query locale to provider region code.
    #[serde(default)]
    pub regions: HashMap<String, String>,
}

impl Default for EngineTraits {
    fn default() -> Self {
        Self::new()
    }
}

impl EngineTraits {
    /// Creates empty tables with `all` as the all-locale code.
    #[must_use]
    pub fn new() -> Self {
        Self {
            all_locale: default_all_locale(),
            languages: HashMap::new(),
            regions: HashMap::new(),
        }
    }

    /// Sets the provider's code for "every region".
    #[must_use]
    pub fn with_all_locale(mut self, code: impl Into<String>) -> Self {
        self.all_locale = code.into();
        self
    }

    /// Adds a language mapping.
    #[must_use]
    pub fn with_language(mut self, locale: impl Into<String>, code: impl Into<String>) -> Self {
        self.languages.insert(locale.into(), code.into());
        self
    }

    /// Adds a region mapping.
    #[must_use]
    pub fn with_region(mut self, locale: impl Into<String>, code: impl Into<String>) -> Self {
        self.regions.insert(locale.into(), code.into());
        self
    }

    /// Provider language for `locale`.
    ///
    /// Lookup order: an empty or `all` locale yields `fallback`, then the
    /// exact locale, then its two-letter language prefix (`de` for `de-AT`),
    /// then `fallback`.
    #[must_use]
    pub fn language<'a>(&'a self, locale: &str, fallback: &'a str) -> &'a str {
        if locale.is_empty() || locale == ALL_LOCALE {
            return fallback;
        }
        self.languages
            .get(locale)
            .or_else(|| locale.get(..2).and_then(|prefix| self.languages.get(prefix)))
            .map_or(fallback, String::as_str)
    }

    /// Provider region for `locale`.
    ///
    /// Regions are country specific, so only the exact locale matches; an
    /// empty or `all` locale and unknown locales yield `fallback`.
    #[must_use]
    pub fn region<'a>(&'a self, locale: &str, fallback: &'a str) -> &'a str {
        if locale.is_empty() || locale == ALL_LOCALE {
            return fallback;
        }
        self.regions.get(locale).map_or(fallback, String::as_str)
    }

    /// Provider region for `locale`, falling back to the all-locale code.
    #[must_use]
    pub fn region_or_all(&self, locale: &str) -> &str {
        self.region(locale, &self.all_locale)
    }

    /// Whether `code` is the provider's "every region" code.
    #[must_use]
    pub fn is_all(&self, code: &str) -> bool {
        code == self.all_locale
    }
}

//! Query context handed to every adapter call.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::errors::{MetasearchError, Result};

/// Safe-search level requested by the user.
///
/// Serializes as `off`/`moderate`/`strict`; deserializes from those names
/// or from the numeric levels `0`/`1`/`2`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "SafeSearchRepr")]
pub enum SafeSearch {
    /// No filtering.
    Off,
    /// Provider default filtering.
    #[default]
    Moderate,
    /// Strictest filtering the provider offers.
    Strict,
}

impl SafeSearch {
    /// Numeric level (0=off, 1=moderate, 2=strict).
    #[must_use]
    pub const fn level(self) -> u8 {
        match self {
            Self::Off => 0,
            Self::Moderate => 1,
            Self::Strict => 2,
        }
    }

    /// Parses `off`, `moderate` or `strict`, case-insensitively.
    pub fn parse(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "off" => Ok(Self::Off),
            "moderate" => Ok(Self::Moderate),
            "strict" => Ok(Self::Strict),
            other => Err(MetasearchError::invalid_params(format!(
                "unknown safe search level '{other}'"
            ))),
        }
    }

    /// Builds a level from its numeric form.
    pub fn from_level(level: u8) -> Result<Self> {
        match level {
            0 => Ok(Self::Off),
            1 => Ok(Self::Moderate),
            2 => Ok(Self::Strict),
            other => Err(MetasearchError::invalid_params(format!(
                "safe search level {other} is not one of 0, 1, 2"
            ))),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SafeSearchRepr {
    Level(u8),
    Name(String),
}

impl TryFrom<SafeSearchRepr> for SafeSearch {
    type Error = MetasearchError;

    fn try_from(repr: SafeSearchRepr) -> Result<Self> {
        match repr {
            SafeSearchRepr::Level(level) => Self::from_level(level),
            SafeSearchRepr::Name(name) => Self::parse(&name),
        }
    }
}

/// Recency filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeRange {
    /// No time restriction (the empty string on the wire).
    #[default]
    #[serde(rename = "")]
    Any,
    /// Last 24 hours.
    Day,
    /// Last 7 days.
    Week,
    /// Last month.
    Month,
    /// Last year.
    Year,
}

impl TimeRange {
    /// Wire form: `""`, `day`, `week`, `month` or `year`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Any => "",
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
            Self::Year => "year",
        }
    }

    /// Parses the wire form.
    pub fn parse(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "" => Ok(Self::Any),
            "day" => Ok(Self::Day),
            "week" => Ok(Self::Week),
            "month" => Ok(Self::Month),
            "year" => Ok(Self::Year),
            other => Err(MetasearchError::invalid_params(format!(
                "unknown time range '{other}'"
            ))),
        }
    }

    /// Whether a restriction applies.
    #[must_use]
    pub const fn is_set(self) -> bool {
        !matches!(self, Self::Any)
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-call query context.
///
/// Immutable once handed to an adapter; `engine_data` carries cross-call
/// state such as an anti-bot token or the handle of a multi-phase search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineParams {
    /// 1-based page number.
    #[serde(default = "default_page")]
    pub page: u32,
    /// Language-region tag such as `en-US`.
    #[serde(default = "default_locale")]
    pub locale: String,
    /// Safe-search level.
    #[serde(default)]
    pub safe_search: SafeSearch,
    /// Recency filter.
    #[serde(default)]
    pub time_range: TimeRange,
    /// Image filter name to constrained value.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub image_filters: HashMap<String, String>,
    /// Video filter name to constrained value.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub video_filters: HashMap<String, String>,
    /// Free-form cross-call state.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub engine_data: HashMap<String, serde_json::Value>,
}

fn default_page() -> u32 {
    1
}

fn default_locale() -> String {
    "en-US".to_string()
}

impl Default for EngineParams {
    fn default() -> Self {
        Self {
            page: default_page(),
            locale: default_locale(),
            safe_search: SafeSearch::default(),
            time_range: TimeRange::default(),
            image_filters: HashMap::new(),
            video_filters: HashMap::new(),
            engine_data: HashMap::new(),
        }
    }
}

impl EngineParams {
    /// Creates parameters for the first page with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the page. Values below 1 are raised to 1.
    #[must_use]
    pub fn with_page(mut self, page: u32) -> Self {
        self.page = page.max(1);
        self
    }

    /// Sets the locale tag.
    #[must_use]
    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = locale.into();
        self
    }

    /// Sets the safe-search level.
    #[must_use]
    pub fn with_safe_search(mut self, safe_search: SafeSearch) -> Self {
        self.safe_search = safe_search;
        self
    }

    /// Sets the time range.
    #[must_use]
    pub fn with_time_range(mut self, time_range: TimeRange) -> Self {
        self.time_range = time_range;
        self
    }

    /// Adds an image filter.
    #[must_use]
    pub fn with_image_filter(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.image_filters.insert(name.into(), value.into());
        self
    }

    /// Adds a video filter.
    #[must_use]
    pub fn with_video_filter(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.video_filters.insert(name.into(), value.into());
        self
    }

    /// Adds an engine data entry.
    #[must_use]
    pub fn with_engine_data(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.engine_data.insert(key.into(), value);
        self
    }

    /// Reads an engine data entry as a string.
    #[must_use]
    pub fn engine_data_str(&self, key: &str) -> Option<&str> {
        self.engine_data.get(key).and_then(serde_json::Value::as_str)
    }

    /// Language part of the locale (`en` for `en-US`), lowercased.
    #[must_use]
    pub fn language(&self) -> String {
        self.locale
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase()
    }

    /// Region part of the locale (`US` for `en-US`), uppercased.
    #[must_use]
    pub fn region(&self) -> Option<String> {
        self.locale
            .split(['-', '_'])
            .nth(1)
            .filter(|r| !r.is_empty())
            .map(str::to_ascii_uppercase)
    }

    /// Checks the invariants a deserialized value may violate.
    pub fn validate(&self) -> Result<()> {
        if self.page < 1 {
            return Err(MetasearchError::invalid_params("page must be 1 or greater"));
        }
        if self.language().is_empty() {
            return Err(MetasearchError::invalid_params(format!(
                "locale '{}' has no language part",
                self.locale
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let params = EngineParams::new();
        assert_eq!(params.page, 1);
        assert_eq!(params.locale, "en-US");
        assert_eq!(params.safe_search, SafeSearch::Moderate);
        assert_eq!(params.time_range, TimeRange::Any);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_page_floor() {
        assert_eq!(EngineParams::new().with_page(0).page, 1);
        assert_eq!(EngineParams::new().with_page(3).page, 3);
    }

    #[test]
    fn test_locale_split() {
        let params = EngineParams::new().with_locale("pt_br");
        assert_eq!(params.language(), "pt");
        assert_eq!(params.region(), Some("BR".to_string()));

        let params = EngineParams::new().with_locale("de");
        assert_eq!(params.language(), "de");
        assert_eq!(params.region(), None);
    }

    #[test]
    fn test_validate_rejects_page_zero() {
        let params = EngineParams {
            page: 0,
            ..EngineParams::default()
        };
        assert!(matches!(
            params.validate(),
            Err(MetasearchError::InvalidParams(_))
        ));
    }

    #[test]
    fn test_safe_search_levels() {
        assert_eq!(SafeSearch::from_level(0).unwrap(), SafeSearch::Off);
        assert_eq!(SafeSearch::from_level(2).unwrap().level(), 2);
        assert!(SafeSearch::from_level(3).is_err());
    }

    #[test]
    fn test_safe_search_accepts_names_and_levels() {
        let level: SafeSearch = serde_json::from_str("1").unwrap();
        assert_eq!(level, SafeSearch::Moderate);
        let name: SafeSearch = serde_json::from_str("\"strict\"").unwrap();
        assert_eq!(name, SafeSearch::Strict);
        assert_eq!(serde_json::from_str::<SafeSearch>("0").unwrap(), SafeSearch::Off);
        assert!(serde_json::from_str::<SafeSearch>("3").is_err());
        assert!(serde_json::from_str::<SafeSearch>("\"extreme\"").is_err());
        assert_eq!(serde_json::to_string(&SafeSearch::Strict).unwrap(), "\"strict\"");

        let params: EngineParams = serde_json::from_str(r#"{"safeSearch": 2}"#).unwrap();
        assert_eq!(params.safe_search, SafeSearch::Strict);
    }

    #[test]
    fn test_time_range_wire_form() {
        assert_eq!(TimeRange::parse("").unwrap(), TimeRange::Any);
        assert_eq!(TimeRange::parse("Week").unwrap(), TimeRange::Week);
        assert!(TimeRange::parse("decade").is_err());
        assert_eq!(TimeRange::Month.to_string(), "month");

        let json = serde_json::to_string(&TimeRange::Any).unwrap();
        assert_eq!(json, "\"\"");
    }

    #[test]
    fn test_deserialize_camel_case() {
        let params: EngineParams = serde_json::from_str(
            r#"{"page": 2, "safeSearch": "strict", "timeRange": "day", "engineData": {"token": "abc"}}"#,
        )
        .unwrap();
        assert_eq!(params.page, 2);
        assert_eq!(params.locale, "en-US");
        assert_eq!(params.safe_search, SafeSearch::Strict);
        assert_eq!(params.time_range, TimeRange::Day);
        assert_eq!(params.engine_data_str("token"), Some("abc"));
    }
}

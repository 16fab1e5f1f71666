//! Configuration types for adapters and the extraction toolkit.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use crate::core::{Category, EngineTraits, ResultDefaults};
use crate::errors::{MetasearchError, Result};
use crate::extract::{
    normalize_duration_with, HarvestOptions, RawDuration, UrlUnwrapper, DEFAULT_MAX_DEPTH,
    DEFAULT_MAX_HARVESTED, DEFAULT_MILLISECOND_THRESHOLD,
};
use crate::pipeline::{BlockDetector, DEFAULT_BLOCK_MARKERS};

/// Static description of one adapter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Engine name, also stamped on every result.
    pub name: String,
    /// Short bang-style identifier.
    #[serde(default)]
    pub shortcut: String,
    /// Categories served; the first is the primary one.
    #[serde(default = "default_categories")]
    pub categories: Vec<Category>,
    /// Whether `page > 1` is supported.
    #[serde(default)]
    pub paging: bool,
    /// Highest page the provider serves.
    #[serde(default)]
    pub max_page: Option<u32>,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: f64,
    /// Ranking weight, also the default result score.
    #[serde(default = "default_weight")]
    pub weight: f64,
    /// Whether the engine is disabled.
    #[serde(default)]
    pub disabled: bool,
    /// Locale to provider language and region tables.
    #[serde(default)]
    pub traits: EngineTraits,
    /// API keys and provider-specific knobs.
    #[serde(default)]
    pub extra: HashMap<String, serde_json::Value>,
}

fn default_categories() -> Vec<Category> {
    vec![Category::General]
}

fn default_timeout() -> f64 {
    5.0
}

fn default_weight() -> f64 {
    1.0
}

impl EngineConfig {
    /// Creates a configuration with defaults.
    #[must_use]
    pub fn new(name: impl Into<String>, shortcut: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            shortcut: shortcut.into(),
            categories: default_categories(),
            paging: false,
            max_page: None,
            timeout_seconds: default_timeout(),
            weight: default_weight(),
            disabled: false,
            traits: EngineTraits::new(),
            extra: HashMap::new(),
        }
    }

    /// Sets the categories.
    #[must_use]
    pub fn with_categories(mut self, categories: impl IntoIterator<Item = Category>) -> Self {
        self.categories = categories.into_iter().collect();
        self
    }

    /// Enables paging with an optional page limit.
    #[must_use]
    pub fn with_paging(mut self, max_page: Option<u32>) -> Self {
        self.paging = true;
        self.max_page = max_page;
        self
    }

    /// Sets the timeout.
    #[must_use]
    pub fn with_timeout(mut self, seconds: f64) -> Self {
        self.timeout_seconds = seconds;
        self
    }

    /// Sets the weight.
    #[must_use]
    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    /// Sets the disabled flag.
    #[must_use]
    pub fn with_disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// Sets the locale tables.
    #[must_use]
    pub fn with_traits(mut self, traits: EngineTraits) -> Self {
        self.traits = traits;
        self
    }

    /// Adds an extra setting.
    #[must_use]
    pub fn with_extra(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    /// Gets timeout as Duration.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::try_from_secs_f64(self.timeout_seconds).unwrap_or(Duration::from_secs(5))
    }

    /// The primary category.
    #[must_use]
    pub fn primary_category(&self) -> Category {
        self.categories.first().copied().unwrap_or_default()
    }

    /// Reads a string extra setting.
    #[must_use]
    pub fn extra_str(&self, key: &str) -> Option<&str> {
        self.extra.get(key).and_then(serde_json::Value::as_str)
    }

    /// Values stamped on results produced by this engine.
    #[must_use]
    pub fn result_defaults(&self) -> ResultDefaults {
        ResultDefaults::new(&self.name, self.weight, self.primary_category())
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns `MetasearchError::Config` for an empty name, a non-positive
    /// timeout, a negative weight or an empty category list.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(MetasearchError::Config("engine name is empty".to_string()));
        }
        if !(self.timeout_seconds.is_finite() && self.timeout_seconds > 0.0) {
            return Err(MetasearchError::Config(format!(
                "engine '{}': timeout must be positive, got {}",
                self.name, self.timeout_seconds
            )));
        }
        if !(self.weight.is_finite() && self.weight >= 0.0) {
            return Err(MetasearchError::Config(format!(
                "engine '{}': weight must be non-negative, got {}",
                self.name, self.weight
            )));
        }
        if self.categories.is_empty() {
            return Err(MetasearchError::Config(format!(
                "engine '{}': at least one category is required",
                self.name
            )));
        }
        Ok(())
    }

    /// Parses and validates a JSON configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or fails validation.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads and validates a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let config: Self = read_json(path.as_ref())?;
        config.validate()?;
        Ok(config)
    }
}

/// Tunables for the shared toolkit plus per-engine settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolkitConfig {
    /// Bot-detection markers, matched case-insensitively.
    #[serde(default = "default_block_markers")]
    pub block_markers: Vec<String>,
    /// Nested redirect bound for URL unwrapping.
    #[serde(default = "default_max_unwrap_depth")]
    pub max_unwrap_depth: usize,
    /// Bare durations above this are milliseconds.
    #[serde(default = "default_millisecond_threshold")]
    pub millisecond_threshold: u64,
    /// Cap on links returned by link harvesting.
    #[serde(default = "default_max_harvested_links")]
    pub max_harvested_links: usize,
    /// Engine configurations.
    #[serde(default)]
    pub engines: Vec<EngineConfig>,
}

fn default_block_markers() -> Vec<String> {
    DEFAULT_BLOCK_MARKERS.iter().map(|m| (*m).to_string()).collect()
}

fn default_max_unwrap_depth() -> usize {
    DEFAULT_MAX_DEPTH
}

fn default_millisecond_threshold() -> u64 {
    DEFAULT_MILLISECOND_THRESHOLD
}

fn default_max_harvested_links() -> usize {
    DEFAULT_MAX_HARVESTED
}

impl Default for ToolkitConfig {
    fn default() -> Self {
        Self {
            block_markers: default_block_markers(),
            max_unwrap_depth: default_max_unwrap_depth(),
            millisecond_threshold: default_millisecond_threshold(),
            max_harvested_links: default_max_harvested_links(),
            engines: Vec::new(),
        }
    }
}

impl ToolkitConfig {
    /// Creates a configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an engine configuration.
    #[must_use]
    pub fn with_engine(mut self, engine: EngineConfig) -> Self {
        self.engines.push(engine);
        self
    }

    /// Looks up an engine by name or shortcut.
    #[must_use]
    pub fn engine(&self, name: &str) -> Option<&EngineConfig> {
        self.engines
            .iter()
            .find(|e| e.name == name || (!e.shortcut.is_empty() && e.shortcut == name))
    }

    /// A block detector with the configured markers.
    #[must_use]
    pub fn block_detector(&self) -> BlockDetector {
        BlockDetector::with_markers(self.block_markers.iter().cloned())
    }

    /// A URL unwrapper with the built-in rules and the configured depth.
    #[must_use]
    pub fn unwrapper(&self) -> UrlUnwrapper {
        UrlUnwrapper::new().with_max_depth(self.max_unwrap_depth)
    }

    /// Link harvesting options with the configured cap and unwrapper.
    #[must_use]
    pub fn harvest_options(&self) -> HarvestOptions {
        HarvestOptions::new()
            .with_max_results(self.max_harvested_links)
            .with_unwrapper(self.unwrapper())
    }

    /// Normalizes a duration with the configured millisecond threshold.
    #[must_use]
    pub fn normalize_duration<'a>(&self, raw: impl Into<RawDuration<'a>>) -> String {
        normalize_duration_with(raw, self.millisecond_threshold)
    }

    /// Validates the toolkit settings and every engine.
    ///
    /// # Errors
    ///
    /// Returns `MetasearchError::Config` on the first invalid setting.
    pub fn validate(&self) -> Result<()> {
        if self.max_unwrap_depth == 0 {
            return Err(MetasearchError::Config(
                "max_unwrap_depth must be at least 1".to_string(),
            ));
        }
        if self.millisecond_threshold == 0 {
            return Err(MetasearchError::Config(
                "millisecond_threshold must be positive".to_string(),
            ));
        }
        for engine in &self.engines {
            engine.validate()?;
        }
        Ok(())
    }

    /// Parses and validates a JSON configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or fails validation.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads and validates a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let config: Self = read_json(path.as_ref())?;
        config.validate()?;
        Ok(config)
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let contents = std::fs::read_to_string(path)?;
    let value = serde_json::from_str(&contents)?;
    tracing::debug!(path = %path.display(), "Loaded configuration");
    Ok(value)
}

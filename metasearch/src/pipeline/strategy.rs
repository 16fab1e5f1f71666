//! Extraction strategies.
//!
//! A strategy is one way of reading results out of a response body. Each
//! carries a [`StrategyKind`] ranking how reliable its signal is; the
//! pipeline runs strategies from most to least reliable.

use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::core::{EngineParams, ResultCandidate};
use crate::errors::{ItemError, Result};
use crate::extract::{harvest_links, json_ld_blocks, json_ld_candidate, HarvestOptions, Selector};

/// Outcome of extracting one item.
pub type ItemResult = std::result::Result<ResultCandidate, ItemError>;

type StrategyFn = dyn Fn(&str, &EngineParams) -> Vec<ItemResult> + Send + Sync;

/// Reliability class of a strategy, most reliable first.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    /// A dedicated JSON API response.
    StructuredJson,
    /// JSON-LD blocks embedded in HTML.
    JsonLd,
    /// Selector-driven scraping of known container markup.
    Selector,
    /// Regex link harvesting and other last resorts.
    Heuristic,
}

impl StrategyKind {
    /// Returns the kind as a string.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::StructuredJson => "structured_json",
            Self::JsonLd => "json_ld",
            Self::Selector => "selector",
            Self::Heuristic => "heuristic",
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One named extraction strategy.
#[derive(Clone)]
pub struct Strategy {
    name: String,
    kind: StrategyKind,
    run: Arc<StrategyFn>,
}

impl fmt::Debug for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Strategy")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

impl Strategy {
    /// Creates a strategy from an arbitrary body function.
    #[must_use]
    pub fn custom<F>(name: impl Into<String>, kind: StrategyKind, f: F) -> Self
    where
        F: Fn(&str, &EngineParams) -> Vec<ItemResult> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            kind,
            run: Arc::new(f),
        }
    }

    /// Parses the body as JSON and hands the document to `f`.
    ///
    /// A body that is not JSON yields nothing.
    #[must_use]
    pub fn json<F>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&Value, &EngineParams) -> Vec<ItemResult> + Send + Sync + 'static,
    {
        let name = name.into();
        let label = name.clone();
        Self::custom(name, StrategyKind::StructuredJson, move |body, params| {
            match serde_json::from_str::<Value>(body) {
                Ok(doc) => f(&doc, params),
                Err(e) => {
                    debug!(strategy = %label, error = %e, "Body is not JSON");
                    Vec::new()
                }
            }
        })
    }

    /// Deserializes the body into `T` and hands it to `f`.
    #[must_use]
    pub fn json_typed<T, F>(name: impl Into<String>, f: F) -> Self
    where
        T: DeserializeOwned + 'static,
        F: Fn(T, &EngineParams) -> Vec<ItemResult> + Send + Sync + 'static,
    {
        let name = name.into();
        let label = name.clone();
        Self::custom(name, StrategyKind::StructuredJson, move |body, params| {
            match serde_json::from_str::<T>(body) {
                Ok(doc) => f(doc, params),
                Err(e) => {
                    debug!(strategy = %label, error = %e, "Body does not match the expected shape");
                    Vec::new()
                }
            }
        })
    }

    /// Maps each element of the JSON array at `pointer` (RFC 6901, `""` for
    /// the root) through `f`. A panic in `f` skips only that item.
    #[must_use]
    pub fn json_items<F>(name: impl Into<String>, pointer: impl Into<String>, f: F) -> Self
    where
        F: Fn(&Value, &EngineParams) -> ItemResult + Send + Sync + 'static,
    {
        let pointer = pointer.into();
        Self::json(name, move |doc, params| {
            doc.pointer(&pointer)
                .and_then(Value::as_array)
                .map(|items| {
                    items
                        .iter()
                        .map(|item| guard_item(|| f(item, params)))
                        .collect()
                })
                .unwrap_or_default()
        })
    }

    /// Maps every JSON-LD result object in an HTML body to a candidate.
    #[must_use]
    pub fn json_ld(name: impl Into<String>) -> Self {
        Self::custom(name, StrategyKind::JsonLd, |body, _params| {
            json_ld_blocks(body)
                .iter()
                .filter_map(json_ld_candidate)
                .map(Ok)
                .collect()
        })
    }

    /// Maps each element matching `selector` through `f`. A panic in `f`
    /// skips only that element.
    ///
    /// # Errors
    ///
    /// Returns `MetasearchError::InvalidSelector` for a malformed selector.
    pub fn selector<F>(name: impl Into<String>, selector: &str, f: F) -> Result<Self>
    where
        F: Fn(&str, &EngineParams) -> ItemResult + Send + Sync + 'static,
    {
        let selector = Selector::parse(selector)?;
        Ok(Self::custom(name, StrategyKind::Selector, move |body, params| {
            selector
                .find_all(body)
                .into_iter()
                .map(|element| guard_item(|| f(element, params)))
                .collect()
        }))
    }

    /// Harvests outbound anchors from the body.
    #[must_use]
    pub fn links(name: impl Into<String>, options: HarvestOptions) -> Self {
        Self::custom(name, StrategyKind::Heuristic, move |body, _params| {
            harvest_links(body, &options).into_iter().map(Ok).collect()
        })
    }

    /// Returns the strategy name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the reliability class.
    #[must_use]
    pub fn kind(&self) -> StrategyKind {
        self.kind
    }

    /// Runs the strategy over a body.
    #[must_use]
    pub fn apply(&self, body: &str, params: &EngineParams) -> Vec<ItemResult> {
        (self.run)(body, params)
    }
}

/// Runs one item mapping, turning a panic into a malformed-item error.
fn guard_item<F>(f: F) -> ItemResult
where
    F: FnOnce() -> ItemResult,
{
    catch_unwind(AssertUnwindSafe(f)).unwrap_or_else(|e| {
        warn!("Item mapping panicked: {:?}", e);
        Err(ItemError::malformed("item mapping panicked"))
    })
}

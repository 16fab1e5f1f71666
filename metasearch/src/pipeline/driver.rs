//! The "first non-empty strategy wins" driver.

use std::collections::HashMap;
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info, warn};

use super::blocking::BlockDetector;
use super::report::{PipelineOutcome, PipelineReport};
use super::strategy::{Strategy, StrategyKind};
use crate::core::{EngineParams, EngineResults, ResultDefaults, SearchResult};
use crate::observability::SpanTimer;

type ListFn = dyn Fn(&str, &EngineParams) -> Vec<String> + Send + Sync;
type EngineDataFn = dyn Fn(&str, &EngineParams) -> HashMap<String, Value> + Send + Sync;

/// How a pipeline screens bodies for blocking pages.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Detection {
    /// Default markers, applied only when some strategy reads HTML.
    Default(BlockDetector),
    /// Set by the adapter; always applied.
    Explicit(BlockDetector),
    Off,
}

/// Ordered strategy list plus side-channel extractors for one adapter.
///
/// Running the pipeline never fails. A blocking page, an unparseable body
/// and a body with no results all produce an empty, well-formed
/// [`EngineResults`].
#[derive(Clone)]
pub struct ExtractionPipeline {
    defaults: ResultDefaults,
    detection: Detection,
    strategies: Vec<Strategy>,
    suggestions: Option<Arc<ListFn>>,
    corrections: Option<Arc<ListFn>>,
    engine_data: Option<Arc<EngineDataFn>>,
}

impl fmt::Debug for ExtractionPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtractionPipeline")
            .field("engine", &self.defaults.engine)
            .field("detection", &self.detection)
            .field("strategies", &self.strategies)
            .finish_non_exhaustive()
    }
}

impl ExtractionPipeline {
    /// Creates a pipeline with the default block detector and no strategies.
    ///
    /// The default detector is skipped when every strategy is
    /// [`StrategyKind::StructuredJson`]; JSON API bodies
    /// are not interstitial pages.
    #[must_use]
    pub fn new(defaults: ResultDefaults) -> Self {
        Self {
            defaults,
            detection: Detection::Default(BlockDetector::new()),
            strategies: Vec::new(),
            suggestions: None,
            corrections: None,
            engine_data: None,
        }
    }

    /// Replaces the block detector. It applies whatever the strategy kinds.
    #[must_use]
    pub fn with_block_detector(mut self, detector: BlockDetector) -> Self {
        self.detection = Detection::Explicit(detector);
        self
    }

    /// Disables block detection.
    #[must_use]
    pub fn without_block_detection(mut self) -> Self {
        self.detection = Detection::Off;
        self
    }

    /// Adds a strategy.
    ///
    /// Strategies run by [`StrategyKind`](super::StrategyKind), most reliable
    /// first; strategies of the same kind keep registration order.
    #[must_use]
    pub fn strategy(mut self, strategy: Strategy) -> Self {
        self.strategies.push(strategy);
        self.strategies.sort_by_key(Strategy::kind);
        self
    }

    /// Sets the suggestions extractor.
    #[must_use]
    pub fn with_suggestions<F>(mut self, f: F) -> Self
    where
        F: Fn(&str, &EngineParams) -> Vec<String> + Send + Sync + 'static,
    {
        self.suggestions = Some(Arc::new(f));
        self
    }

    /// Sets the corrections extractor.
    #[must_use]
    pub fn with_corrections<F>(mut self, f: F) -> Self
    where
        F: Fn(&str, &EngineParams) -> Vec<String> + Send + Sync + 'static,
    {
        self.corrections = Some(Arc::new(f));
        self
    }

    /// Sets the engine data extractor for multi-phase protocols.
    #[must_use]
    pub fn with_engine_data<F>(mut self, f: F) -> Self
    where
        F: Fn(&str, &EngineParams) -> HashMap<String, Value> + Send + Sync + 'static,
    {
        self.engine_data = Some(Arc::new(f));
        self
    }

    /// Returns the result defaults.
    #[must_use]
    pub fn defaults(&self) -> &ResultDefaults {
        &self.defaults
    }

    /// Returns the detector applied to bodies, if any.
    #[must_use]
    pub fn block_detector(&self) -> Option<&BlockDetector> {
        match &self.detection {
            Detection::Explicit(detector) => Some(detector),
            Detection::Default(detector)
                if self
                    .strategies
                    .iter()
                    .any(|s| s.kind() != StrategyKind::StructuredJson) =>
            {
                Some(detector)
            }
            Detection::Default(_) | Detection::Off => None,
        }
    }

    /// Returns the strategies in execution order.
    #[must_use]
    pub fn strategies(&self) -> &[Strategy] {
        &self.strategies
    }

    /// Runs the pipeline over a response body.
    #[must_use]
    pub fn run(&self, body: &str, params: &EngineParams) -> EngineResults {
        self.run_with_report(body, params).0
    }

    /// Runs the pipeline and reports how it ended.
    #[must_use]
    pub fn run_with_report(&self, body: &str, params: &EngineParams) -> (EngineResults, PipelineReport) {
        let timer = SpanTimer::start(format!("pipeline:{}", self.defaults.engine));
        let engine = self.defaults.engine.as_str();

        if let Some(marker) = self.block_detector().and_then(|d| d.is_blocked(body)) {
            info!(engine, marker, "Blocking page detected, returning no results");
            let report = PipelineReport {
                outcome: PipelineOutcome::Blocked {
                    marker: marker.to_string(),
                },
                strategies_tried: Vec::new(),
                skipped_items: 0,
                duration_ms: timer.finish(),
            };
            return (EngineResults::new(), report);
        }

        let mut strategies_tried = Vec::new();
        let mut skipped_items = 0;
        let mut outcome = PipelineOutcome::Empty;
        let mut results = Vec::new();

        for strategy in &self.strategies {
            strategies_tried.push(strategy.name().to_string());

            let Some(items) = guarded(engine, strategy.name(), || strategy.apply(body, params))
            else {
                continue;
            };

            let (found, skipped) = self.finalize_items(strategy, items);
            skipped_items += skipped;
            debug!(
                engine,
                strategy = strategy.name(),
                kind = %strategy.kind(),
                count = found.len(),
                skipped,
                "Strategy finished"
            );

            if !found.is_empty() {
                outcome = PipelineOutcome::Resolved {
                    strategy: strategy.name().to_string(),
                    kind: strategy.kind(),
                };
                results = found;
                break;
            }
        }

        let mut out = EngineResults::with_results(results);
        if let Some(f) = &self.suggestions {
            out.suggestions = guarded(engine, "suggestions", || f(body, params)).unwrap_or_default();
        }
        if let Some(f) = &self.corrections {
            out.corrections = guarded(engine, "corrections", || f(body, params)).unwrap_or_default();
        }
        if let Some(f) = &self.engine_data {
            out.engine_data = guarded(engine, "engine_data", || f(body, params)).unwrap_or_default();
        }

        if matches!(outcome, PipelineOutcome::Empty) {
            debug!(engine, tried = strategies_tried.len(), "No strategy produced results");
        }

        let report = PipelineReport {
            outcome,
            strategies_tried,
            skipped_items,
            duration_ms: timer.finish(),
        };
        (out, report)
    }

    /// Drops failed and incomplete items, returning the kept results and
    /// the number dropped.
    fn finalize_items(
        &self,
        strategy: &Strategy,
        items: Vec<super::ItemResult>,
    ) -> (Vec<SearchResult>, usize) {
        let mut found = Vec::with_capacity(items.len());
        let mut skipped = 0;

        for item in items {
            let candidate = match item {
                Ok(candidate) => candidate,
                Err(e) => {
                    debug!(engine = %self.defaults.engine, strategy = strategy.name(), error = %e, "Skipping item");
                    skipped += 1;
                    continue;
                }
            };
            if let Err(e) = candidate.check() {
                debug!(engine = %self.defaults.engine, strategy = strategy.name(), error = %e, "Skipping incomplete item");
                skipped += 1;
                continue;
            }
            if let Some(result) = candidate.finalize(&self.defaults) {
                found.push(result);
            }
        }

        (found, skipped)
    }
}

/// Runs `f`, turning a panic into `None`.
fn guarded<T>(engine: &str, stage: &str, f: impl FnOnce() -> T) -> Option<T> {
    match catch_unwind(AssertUnwindSafe(f)) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(engine, stage, "Extraction panicked: {:?}", e);
            None
        }
    }
}

//! Adapter contract.
//!
//! Every adapter describes itself through an [`EngineConfig`] and turns a
//! query into a [`RequestConfig`], then a fetched body into
//! [`EngineResults`]. Fetching itself belongs to the caller.

use std::time::Duration;

use crate::config::EngineConfig;
use crate::core::{
    Category, EngineParams, EngineResults, EngineTraits, RequestConfig, ResultDefaults,
};
use crate::errors::{MetasearchError, Result};

/// A single search provider adapter.
pub trait Engine: Send + Sync {
    /// Static configuration.
    fn config(&self) -> &EngineConfig;

    /// Builds the outbound request.
    fn build_request(&self, query: &str, params: &EngineParams) -> Result<RequestConfig>;

    /// Parses a fetched body. Never fails; unusable bodies yield empty results.
    fn parse_response(&self, body: &str, params: &EngineParams) -> EngineResults;

    /// Engine name.
    fn name(&self) -> &str {
        &self.config().name
    }

    /// Short identifier.
    fn shortcut(&self) -> &str {
        &self.config().shortcut
    }

    /// Categories served.
    fn categories(&self) -> &[Category] {
        &self.config().categories
    }

    /// Whether `page > 1` is supported.
    fn supports_paging(&self) -> bool {
        self.config().paging
    }

    /// Highest page served, if bounded.
    fn max_page(&self) -> Option<u32> {
        self.config().max_page
    }

    /// Request timeout.
    fn timeout(&self) -> Duration {
        self.config().timeout()
    }

    /// Ranking weight.
    fn weight(&self) -> f64 {
        self.config().weight
    }

    /// Whether the engine is disabled.
    fn disabled(&self) -> bool {
        self.config().disabled
    }

    /// Locale to provider language and region tables.
    fn traits(&self) -> &EngineTraits {
        &self.config().traits
    }

    /// Values stamped on every result this engine produces.
    fn result_defaults(&self) -> ResultDefaults {
        self.config().result_defaults()
    }

    /// Validates the query, then builds the request.
    fn prepare_request(&self, query: &str, params: &EngineParams) -> Result<RequestConfig>
    where
        Self: Sized,
    {
        validate_request(self, query, params)?;
        self.build_request(query.trim(), params)
    }
}

/// Checks a query against an engine's capabilities before building a request.
///
/// # Errors
///
/// Returns `MetasearchError::EngineDisabled` for a disabled engine and
/// `MetasearchError::InvalidParams` for an empty query, a page the engine
/// cannot serve, or invalid params.
pub fn validate_request(engine: &dyn Engine, query: &str, params: &EngineParams) -> Result<()> {
    if engine.disabled() {
        return Err(MetasearchError::EngineDisabled(engine.name().to_string()));
    }
    if query.trim().is_empty() {
        return Err(MetasearchError::invalid_params("query is empty"));
    }
    params.validate()?;
    if params.page > 1 && !engine.supports_paging() {
        return Err(MetasearchError::invalid_params(format!(
            "engine '{}' does not support paging",
            engine.name()
        )));
    }
    if let Some(max) = engine.max_page() {
        if params.page > max {
            return Err(MetasearchError::invalid_params(format!(
                "page {} exceeds engine '{}' limit of {max}",
                params.page,
                engine.name()
            )));
        }
    }
    tracing::trace!(engine = engine.name(), page = params.page, "Request validated");
    Ok(())
}

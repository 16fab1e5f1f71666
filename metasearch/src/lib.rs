//! # Metasearch
//!
//! Shared extraction toolkit and strategy pipeline for meta-search engine
//! adapters.
//!
//! Every adapter turns a query into a request and a fetched provider body
//! into normalized results. This crate provides the pieces they share:
//!
//! - **Normalized schema**: query params, request descriptions and result records
//! - **Extraction toolkit**: entity decoding, text extraction, `tag.class`
//!   matching, redirect unwrapping, duration and magnitude normalization
//! - **Strategy pipeline**: ordered extraction strategies with bot-detection
//!   short-circuit, where the first non-empty strategy wins
//! - **Adapter contract**: the `Engine` trait and request validation
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use metasearch::prelude::*;
//!
//! let config = EngineConfig::new("example", "ex");
//! let pipeline = ExtractionPipeline::new(config.result_defaults())
//!     .strategy(Strategy::json_ld("json-ld"))
//!     .strategy(Strategy::selector("results", "div.result", parse_block)?)
//!     .strategy(Strategy::links("anchors", HarvestOptions::new()));
//!
//! let results = pipeline.run(&body, &EngineParams::new());
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod config;
pub mod core;
pub mod engine;
pub mod errors;
pub mod extract;
pub mod observability;
pub mod pipeline;
pub mod testing;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::{EngineConfig, ToolkitConfig};
    pub use crate::core::{
        build_url, Category, EngineParams, EngineResults, HttpMethod, RequestConfig,
        EngineTraits, ResultCandidate, ResultDefaults, SafeSearch, SearchResult, TimeRange,
    };
    pub use crate::engine::{validate_request, Engine};
    pub use crate::errors::{ItemError, MetasearchError, Result};
    pub use crate::extract::{
        attribute, decode_entities, extract_text, find_elements, first_element,
        normalize_duration, parse_magnitude, unwrap_url, HarvestOptions, Selector,
    };
    pub use crate::observability::{init_tracing, LogFormat};
    pub use crate::pipeline::{
        BlockDetector, ExtractionPipeline, ItemResult, PipelineReport, Strategy, StrategyKind,
    };
}

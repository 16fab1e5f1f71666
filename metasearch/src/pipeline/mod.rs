//! Strategy pipeline.
//!
//! This module provides:
//! - Extraction strategies ranked by reliability
//! - Bot-detection short-circuit
//! - The "first non-empty strategy wins" driver
//! - Per-run reports

mod blocking;
mod driver;
mod report;
mod strategy;

#[cfg(test)]
mod integration_tests;

pub use blocking::{BlockDetector, DEFAULT_BLOCK_MARKERS};
pub use driver::ExtractionPipeline;
pub use report::{PipelineOutcome, PipelineReport};
pub use strategy::{ItemResult, Strategy, StrategyKind};

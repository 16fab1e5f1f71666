//! Normalized schema shared by every adapter.
//!
//! This module contains the types the toolkit speaks in:
//! - Query context (`EngineParams`)
//! - Wire requests (`RequestConfig`)
//! - Result records and their builder (`SearchResult`, `ResultCandidate`)
//! - Per-call output (`EngineResults`)
//! - Per-engine locale tables (`EngineTraits`)

mod params;
mod request;
mod result;
mod results;
mod traits;

pub use params::{EngineParams, SafeSearch, TimeRange};
pub use request::{build_url, HttpMethod, RequestConfig};
pub use result::{Category, ResultCandidate, ResultDefaults, SearchResult};
pub use results::EngineResults;
pub use traits::{EngineTraits, ALL_LOCALE};

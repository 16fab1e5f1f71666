//! Testing utilities for engine adapters.
//!
//! This module provides:
//! - Sample provider bodies (HTML, JSON-LD, JSON API, RSS, CAPTCHA)
//! - Schema assertions for adapter output

mod assertions;
mod fixtures;

pub use assertions::{
    assert_canonical_duration, assert_empty_results, assert_result_urls, assert_result_valid,
    assert_results_valid,
};
pub use fixtures::{
    result_page, CAPTCHA_PAGE_HTML, JSON_LD_PAGE_HTML, LINK_ONLY_HTML, RESULT_PAGE_HTML,
    RSS_FEED_XML, VIDEO_API_JSON,
};

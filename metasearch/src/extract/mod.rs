//! Extraction toolkit.
//!
//! Pure, synchronous functions that turn inconsistent third-party markup
//! into clean values:
//! - Entity decoding and visible-text extraction
//! - Tolerant `tag.class` element matching
//! - Redirect URL unwrapping
//! - Duration, magnitude, date and pagination normalization
//! - JSON-LD, link and feed extraction
//!
//! Nothing here returns an error for bad input; malformed markup degrades to
//! empty output.

mod attributes;
mod dates;
mod duration;
mod entities;
#[cfg(feature = "feeds")]
mod feed;
mod jsonld;
mod links;
mod magnitude;
mod pagination;
mod selector;
mod text;
mod unwrap;

pub use attributes::{attribute, has_class, inner_html, open_tag, parse_attributes};
pub use dates::{format_published, normalize_published, parse_published};
pub use duration::{
    format_seconds, normalize_duration, normalize_duration_with, RawDuration,
    DEFAULT_MILLISECOND_THRESHOLD,
};
pub use entities::decode_entities;
#[cfg(feature = "feeds")]
pub use feed::{feed_items, FeedItem};
pub use jsonld::{has_type, json_ld_blocks, json_ld_candidate};
pub use links::{harvest_links, HarvestOptions, DEFAULT_MAX_HARVESTED};
pub use magnitude::{parse_magnitude, parse_magnitude_opt};
pub use pagination::{clamp_page, page_offset, page_offset_from};
pub use selector::{find_elements, first_element, Selector};
pub use text::{collapse_whitespace, extract_text, strip_tags};
pub use unwrap::{query_param, unwrap_url, RedirectRule, UrlUnwrapper, DEFAULT_MAX_DEPTH};

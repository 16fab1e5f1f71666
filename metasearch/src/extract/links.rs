//! Last-resort link harvesting with a regex over `<a href>` anchors.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use super::entities::decode_entities;
use super::text::extract_text;
use super::unwrap::UrlUnwrapper;
use crate::core::ResultCandidate;

/// Default cap on harvested links.
pub const DEFAULT_MAX_HARVESTED: usize = 50;

static ANCHOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<a\s[^>]*?href\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s>]+))[^>]*>(.*?)</a\s*>"#)
        .expect("Invalid anchor regex")
});

/// Options for [`harvest_links`].
#[derive(Debug, Clone)]
pub struct HarvestOptions {
    /// Hosts (and their subdomains) to drop, usually the provider's own.
    pub exclude_hosts: Vec<String>,
    /// Maximum number of links returned.
    pub max_results: usize,
    /// Unwrapper applied to each href.
    pub unwrapper: UrlUnwrapper,
}

impl Default for HarvestOptions {
    fn default() -> Self {
        Self {
            exclude_hosts: Vec::new(),
            max_results: DEFAULT_MAX_HARVESTED,
            unwrapper: UrlUnwrapper::new(),
        }
    }
}

impl HarvestOptions {
    /// Creates default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Excludes a host and its subdomains.
    #[must_use]
    pub fn exclude_host(mut self, host: impl Into<String>) -> Self {
        self.exclude_hosts.push(host.into().to_ascii_lowercase());
        self
    }

    /// Sets the result cap.
    #[must_use]
    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    /// Sets the unwrapper.
    #[must_use]
    pub fn with_unwrapper(mut self, unwrapper: UrlUnwrapper) -> Self {
        self.unwrapper = unwrapper;
        self
    }

    fn is_excluded(&self, host: &str) -> bool {
        let host = host.to_ascii_lowercase();
        let host = host.strip_prefix("www.").unwrap_or(host.as_str());
        self.exclude_hosts.iter().any(|ex| {
            let ex = ex.strip_prefix("www.").unwrap_or(ex.as_str());
            host == ex || host.ends_with(&format!(".{ex}"))
        })
    }
}

/// Harvests outbound links from raw HTML in document order.
///
/// Each href is entity-decoded and unwrapped; only absolute http(s) targets
/// on non-excluded hosts with non-empty anchor text are kept, de-duplicated
/// by URL.
#[must_use]
pub fn harvest_links(html: &str, options: &HarvestOptions) -> Vec<ResultCandidate> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();

    for caps in ANCHOR.captures_iter(html) {
        if out.len() >= options.max_results {
            break;
        }
        let Some(raw_href) = caps.get(1).or_else(|| caps.get(2)).or_else(|| caps.get(3)) else {
            continue;
        };
        let href = options.unwrapper.unwrap(&decode_entities(raw_href.as_str().trim()));
        let href = if href.starts_with("//") {
            format!("https:{href}")
        } else {
            href
        };

        let Ok(parsed) = url::Url::parse(&href) else {
            continue;
        };
        if !matches!(parsed.scheme(), "http" | "https") {
            continue;
        }
        if parsed.host_str().is_some_and(|h| options.is_excluded(h)) {
            continue;
        }

        let title = caps.get(4).map(|m| extract_text(m.as_str())).unwrap_or_default();
        if title.is_empty() || !seen.insert(href.clone()) {
            continue;
        }

        out.push(ResultCandidate::new().with_url(href).with_title(title));
    }

    out
}

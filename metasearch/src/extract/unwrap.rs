//! Redirect and proxy URL unwrapping.
//!
//! Search engines wrap result links in click-tracking redirectors. Each
//! [`RedirectRule`] recognizes one redirector shape and recovers the
//! destination. Unwrapping is best-effort: any failed step returns the
//! original `href`.

use std::sync::LazyLock;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use percent_encoding::percent_decode_str;
use url::form_urlencoded;

/// Default number of nested redirects followed.
pub const DEFAULT_MAX_DEPTH: usize = 4;

/// One redirector shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RedirectRule {
    /// The destination sits in a query parameter, e.g. `/url?q=...`.
    QueryParam {
        /// Substring identifying the redirector.
        marker: String,
        /// Parameters tried in order.
        params: Vec<String>,
    },
    /// The destination is base64url-encoded behind a fixed prefix, e.g.
    /// `/ck/a?u=a1aHR0cHM6...`.
    Base64Param {
        /// Substring identifying the redirector.
        marker: String,
        /// Parameter holding the encoded value.
        param: String,
        /// Marker stripped before decoding.
        prefix: String,
    },
    /// The destination is embedded in the path between `marker` and
    /// `terminator`, e.g. `/RU=https%3a.../RK=2/RS=...`.
    PathSegment {
        /// Segment start marker.
        marker: String,
        /// Segment end marker; the end of input when absent.
        terminator: String,
    },
}

impl RedirectRule {
    /// Creates a query-parameter rule.
    #[must_use]
    pub fn query_param(marker: impl Into<String>, params: &[&str]) -> Self {
        Self::QueryParam {
            marker: marker.into(),
            params: params.iter().map(|p| (*p).to_string()).collect(),
        }
    }

    /// Creates a base64 parameter rule.
    #[must_use]
    pub fn base64_param(
        marker: impl Into<String>,
        param: impl Into<String>,
        prefix: impl Into<String>,
    ) -> Self {
        Self::Base64Param {
            marker: marker.into(),
            param: param.into(),
            prefix: prefix.into(),
        }
    }

    /// Creates a path-segment rule.
    #[must_use]
    pub fn path_segment(marker: impl Into<String>, terminator: impl Into<String>) -> Self {
        Self::PathSegment {
            marker: marker.into(),
            terminator: terminator.into(),
        }
    }

    fn marker(&self) -> &str {
        match self {
            Self::QueryParam { marker, .. }
            | Self::Base64Param { marker, .. }
            | Self::PathSegment { marker, .. } => marker.as_str(),
        }
    }

    /// Applies the rule once. `None` means "not this redirector" or a
    /// failed decode.
    fn apply(&self, href: &str, max_depth: usize) -> Option<String> {
        if !href.contains(self.marker()) {
            return None;
        }
        match self {
            Self::QueryParam { params, .. } => params
                .iter()
                .find_map(|p| query_param(href, p))
                .map(|v| percent_decode_repeated(&v, max_depth)),
            Self::Base64Param { param, prefix, .. } => {
                let value = query_param(href, param)?;
                decode_base64url(value.strip_prefix(prefix.as_str())?)
            }
            Self::PathSegment { marker, terminator } => {
                let start = href.find(marker.as_str())? + marker.len();
                let rest = &href[start..];
                let segment = rest.find(terminator.as_str()).map_or(rest, |end| &rest[..end]);
                Some(percent_decode_repeated(segment, max_depth))
            }
        }
    }
}

static BUILTIN_RULES: LazyLock<Vec<RedirectRule>> = LazyLock::new(|| {
    vec![
        RedirectRule::query_param("/url?", &["q", "url"]),
        RedirectRule::query_param("/l/?", &["uddg"]),
        RedirectRule::base64_param("/ck/a?", "u", "a1"),
        RedirectRule::path_segment("/RU=", "/RK="),
        RedirectRule::query_param("/redirect?", &["url", "u"]),
    ]
});

static DEFAULT_UNWRAPPER: LazyLock<UrlUnwrapper> = LazyLock::new(UrlUnwrapper::new);

/// Applies redirect rules until the href stops changing or the depth bound
/// is reached.
#[derive(Debug, Clone)]
pub struct UrlUnwrapper {
    rules: Vec<RedirectRule>,
    max_depth: usize,
}

impl Default for UrlUnwrapper {
    fn default() -> Self {
        Self::new()
    }
}

impl UrlUnwrapper {
    /// Creates an unwrapper with the built-in rules.
    #[must_use]
    pub fn new() -> Self {
        Self {
            rules: BUILTIN_RULES.clone(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Creates an unwrapper with no rules.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            rules: Vec::new(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Adds a provider-specific rule, tried after the existing ones.
    #[must_use]
    pub fn with_rule(mut self, rule: RedirectRule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Sets the nesting bound (at least 1).
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth.max(1);
        self
    }

    /// Returns the configured nesting bound.
    #[must_use]
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Recovers the destination of `href`, or returns it unchanged.
    #[must_use]
    pub fn unwrap(&self, href: &str) -> String {
        let mut current = href.to_string();

        for _ in 0..self.max_depth {
            let next = self
                .rules
                .iter()
                .filter_map(|rule| rule.apply(&current, self.max_depth))
                .find(|candidate| is_navigable(candidate));
            match next {
                Some(next) if next != current => current = next,
                _ => break,
            }
        }

        current
    }
}

/// Unwraps `href` with the built-in rules.
#[must_use]
pub fn unwrap_url(href: &str) -> String {
    DEFAULT_UNWRAPPER.unwrap(href)
}

/// Reads a query parameter from a URL or a relative `path?query` href.
///
/// The value is form-decoded once (`%XX` and `+`).
#[must_use]
pub fn query_param(url: &str, name: &str) -> Option<String> {
    let query = url.split_once('?')?.1;
    let query = query.split_once('#').map_or(query, |(q, _)| q);
    // entity-escaped separators survive in scraped hrefs
    let query = query.replace("&amp;", "&");
    form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
}

/// Percent-decodes until the value looks like a URL or stops changing.
fn percent_decode_repeated(value: &str, max_depth: usize) -> String {
    let mut current = value.to_string();
    for _ in 0..max_depth {
        if current.contains("://") || !current.contains('%') {
            break;
        }
        let decoded = percent_decode_str(&current).decode_utf8_lossy().into_owned();
        if decoded == current {
            break;
        }
        current = decoded;
    }
    current
}

/// Decodes base64url (no padding required) into UTF-8 text.
fn decode_base64url(value: &str) -> Option<String> {
    let mut standard: String = value
        .trim()
        .chars()
        .map(|c| match c {
            '-' => '+',
            '_' => '/',
            other => other,
        })
        .collect();
    while standard.len() % 4 != 0 {
        standard.push('=');
    }
    let bytes = STANDARD.decode(standard.as_bytes()).ok()?;
    String::from_utf8(bytes).ok()
}

/// Whether an unwrapped value is an absolute http(s) or protocol-relative URL.
fn is_navigable(value: &str) -> bool {
    if value.starts_with("//") {
        return value.len() > 2;
    }
    url::Url::parse(value).is_ok_and(|u| matches!(u.scheme(), "http" | "https"))
}

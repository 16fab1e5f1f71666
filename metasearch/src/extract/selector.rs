//! Tolerant `tag` / `tag.class` element matching over raw HTML.
//!
//! No tree is built. Each matching opening tag is followed forward with a
//! depth counter: every nested `<tag` raises it, every `</tag>` lowers it,
//! self-closing `<tag .../>` leaves it alone. The element ends where the
//! depth returns to zero; if the input ends first, the element runs to the
//! end of the input. Matching never fails: "no elements" is the empty-result
//! signal.

use std::fmt;
use std::str::FromStr;

use super::attributes::{find_tag_end, has_class};
use crate::errors::{MetasearchError, Result};

/// HTML elements that never have content or a closing tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source",
    "track", "wbr",
];

/// A parsed `tag` or `tag.class` selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    tag: String,
    class: Option<String>,
    void_aware: bool,
}

impl Selector {
    /// Parses `tag` or `tag.class`. The tag is matched case-insensitively,
    /// the class case-sensitively as a whitespace-delimited token.
    pub fn parse(selector: &str) -> Result<Self> {
        let selector = selector.trim();
        let (tag, class) = match selector.split_once('.') {
            Some((tag, class)) => (tag, Some(class)),
            None => (selector, None),
        };

        let valid_tag = !tag.is_empty()
            && tag.starts_with(|c: char| c.is_ascii_alphabetic())
            && tag.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == ':');
        let valid_class = class.map_or(true, |c| {
            !c.is_empty() && !c.contains('.') && !c.chars().any(char::is_whitespace)
        });
        if !valid_tag || !valid_class {
            return Err(MetasearchError::InvalidSelector(selector.to_string()));
        }

        Ok(Self {
            tag: tag.to_ascii_lowercase(),
            class: class.map(String::from),
            void_aware: true,
        })
    }

    /// Treats every tag as a container, for XML feeds where `<link>` has content.
    #[must_use]
    pub fn xml(mut self) -> Self {
        self.void_aware = false;
        self
    }

    /// The lowercased tag name.
    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// The required class token, if any.
    #[must_use]
    pub fn class(&self) -> Option<&str> {
        self.class.as_deref()
    }

    fn is_void(&self) -> bool {
        self.void_aware && VOID_ELEMENTS.contains(&self.tag.as_str())
    }

    /// Returns every top-level matching element, opening tag through its
    /// closing tag, in document order.
    #[must_use]
    pub fn find_all<'a>(&self, html: &'a str) -> Vec<&'a str> {
        let mut found = Vec::new();
        if html.is_empty() {
            return found;
        }

        let lower = html.to_ascii_lowercase();
        let open_pat = format!("<{}", self.tag);
        let close_pat = format!("</{}", self.tag);
        let mut pos = 0;

        while let Some(start) = find_name(&lower, pos, &open_pat) {
            let Some(gt) = find_tag_end(html, start) else {
                break;
            };
            let open = &html[start..=gt];

            if let Some(class) = &self.class {
                if !has_class(open, class) {
                    pos = gt + 1;
                    continue;
                }
            }

            if self.is_void() || open.ends_with("/>") {
                found.push(open);
                pos = gt + 1;
                continue;
            }

            let end = element_end(html, &lower, gt + 1, &open_pat, &close_pat);
            found.push(&html[start..end]);
            pos = end;
        }

        found
    }

    /// Returns the first matching element.
    #[must_use]
    pub fn find_first<'a>(&self, html: &'a str) -> Option<&'a str> {
        self.find_all(html).into_iter().next()
    }
}

impl FromStr for Selector {
    type Err = MetasearchError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.class {
            Some(class) => write!(f, "{}.{}", self.tag, class),
            None => f.write_str(&self.tag),
        }
    }
}

/// Finds `pattern` (`<tag` or `</tag`) at or after `from` where the tag name
/// is not a prefix of a longer name.
fn find_name(lower: &str, mut from: usize, pattern: &str) -> Option<usize> {
    while let Some(rel) = lower.get(from..)?.find(pattern) {
        let at = from + rel;
        let next = lower.as_bytes().get(at + pattern.len()).copied();
        match next {
            None => return Some(at),
            Some(b) if b.is_ascii_whitespace() || b == b'>' || b == b'/' => return Some(at),
            _ => from = at + 1,
        }
    }
    None
}

/// Byte index just past the closing tag that balances the element whose
/// opening tag ended right before `from`.
fn element_end(html: &str, lower: &str, from: usize, open_pat: &str, close_pat: &str) -> usize {
    let mut depth = 1usize;
    let mut cursor = from;

    loop {
        let next_close = find_name(lower, cursor, close_pat);
        let next_open = find_name(lower, cursor, open_pat);

        match (next_open, next_close) {
            (_, None) => return html.len(),
            (Some(open), Some(close)) if open < close => match find_tag_end(html, open) {
                Some(gt) => {
                    if !html[..=gt].ends_with("/>") {
                        depth += 1;
                    }
                    cursor = gt + 1;
                }
                None => return html.len(),
            },
            (_, Some(close)) => {
                let close_end = lower[close..].find('>').map_or(html.len(), |g| close + g + 1);
                depth -= 1;
                if depth == 0 {
                    return close_end;
                }
                cursor = close_end;
            }
        }
    }
}

/// Finds all top-level elements matching `selector` (`tag` or `tag.class`).
///
/// An invalid selector yields no matches.
#[must_use]
pub fn find_elements(html: &str, selector: &str) -> Vec<String> {
    Selector::parse(selector).map_or_else(
        |_| Vec::new(),
        |sel| sel.find_all(html).into_iter().map(String::from).collect(),
    )
}

/// Finds the first element matching `selector`.
#[must_use]
pub fn first_element(html: &str, selector: &str) -> Option<String> {
    Selector::parse(selector)
        .ok()?
        .find_first(html)
        .map(String::from)
}

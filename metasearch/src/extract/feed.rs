//! RSS and Atom item extraction.

use serde::{Deserialize, Serialize};

use super::attributes::{attribute, inner_html};
use super::dates::normalize_published;
use super::entities::decode_entities;
use super::selector::Selector;
use super::text::extract_text;
use crate::core::ResultCandidate;

/// One RSS `<item>` or Atom `<entry>`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedItem {
    /// Item title as plain text.
    pub title: String,
    /// Item link.
    pub link: String,
    /// Description, summary or content as plain text.
    pub description: String,
    /// Raw publication date as sent by the feed.
    pub published: Option<String>,
    /// Author name.
    pub author: Option<String>,
}

impl FeedItem {
    /// Converts into a result candidate, normalizing the date.
    #[must_use]
    pub fn into_candidate(self) -> ResultCandidate {
        let mut candidate = ResultCandidate::new()
            .with_url(self.link)
            .with_title(self.title)
            .with_content(self.description);
        if let Some(published) = self.published.as_deref() {
            candidate = candidate.with_published(published);
        }
        if let Some(author) = self.author {
            candidate = candidate.with_author(author);
        }
        candidate
    }

    /// The publication date normalized to `YYYY-MM-DDTHH:MM:SSZ`.
    #[must_use]
    pub fn published_normalized(&self) -> Option<String> {
        self.published.as_deref().and_then(normalize_published)
    }
}

/// Extracts every RSS `<item>` and Atom `<entry>` from a feed document.
#[must_use]
pub fn feed_items(xml: &str) -> Vec<FeedItem> {
    let mut items = Vec::new();
    for tag in ["item", "entry"] {
        let Ok(selector) = Selector::parse(tag) else {
            continue;
        };
        items.extend(selector.xml().find_all(xml).into_iter().map(parse_item));
    }
    items
}

fn parse_item(element: &str) -> FeedItem {
    let body = inner_html(element);

    FeedItem {
        title: child_text(body, "title").unwrap_or_default(),
        link: item_link(body).unwrap_or_default(),
        description: ["description", "summary", "content", "content:encoded"]
            .iter()
            .find_map(|tag| child_text(body, tag))
            .unwrap_or_default(),
        published: ["pubDate", "published", "updated", "dc:date"]
            .iter()
            .find_map(|tag| child_text(body, tag)),
        author: child(body, "author")
            .and_then(|author| child_text(inner_html(author), "name").or_else(|| text_of(author)))
            .or_else(|| child_text(body, "dc:creator")),
    }
}

/// RSS `<link>text</link>` or Atom `<link href="..."/>`, preferring
/// `rel="alternate"`.
fn item_link(body: &str) -> Option<String> {
    let links = Selector::parse("link").ok()?.xml().find_all(body);
    let alternate = links.iter().find(|l| {
        attribute(l, "rel").map_or(true, |rel| rel.eq_ignore_ascii_case("alternate"))
    });
    let chosen = alternate.or_else(|| links.first())?;
    attribute(chosen, "href")
        .filter(|href| !href.trim().is_empty())
        .or_else(|| text_of(chosen))
}

fn child<'a>(body: &'a str, tag: &str) -> Option<&'a str> {
    Selector::parse(tag).ok()?.xml().find_first(body)
}

fn child_text(body: &str, tag: &str) -> Option<String> {
    child(body, tag).and_then(text_of)
}

/// Plain text of an element, unwrapping CDATA and entity-escaped markup.
fn text_of(element: &str) -> Option<String> {
    let inner = inner_html(element).trim();
    let raw = inner
        .strip_prefix("<![CDATA[")
        .and_then(|rest| rest.strip_suffix("]]>"))
        .unwrap_or(inner);
    let text = if !raw.contains('<') && raw.contains("&lt;") {
        extract_text(&decode_entities(raw))
    } else {
        extract_text(raw)
    };
    (!text.is_empty()).then_some(text)
}

//! Normalized search result records.
//!
//! Strategies assemble a [`ResultCandidate`] with every field optional and
//! turn it into a [`SearchResult`] through [`ResultCandidate::finalize`],
//! which enforces the mandatory `url`/`title` pair and fills the defaulted
//! fields. A candidate missing either mandatory field yields no record at all.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::errors::ItemError;
use crate::extract::{normalize_duration, normalize_published, parse_magnitude, RawDuration};

/// Result category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// General web results.
    #[default]
    General,
    /// Images.
    Images,
    /// Videos.
    Videos,
    /// News articles.
    News,
    /// Music and audio.
    Music,
    /// Files and torrents.
    Files,
    /// Package registries and code hosting.
    It,
    /// Academic papers.
    Science,
    /// Social platforms.
    Social,
    /// Maps and places.
    Map,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::General => "general",
            Self::Images => "images",
            Self::Videos => "videos",
            Self::News => "news",
            Self::Music => "music",
            Self::Files => "files",
            Self::It => "it",
            Self::Science => "science",
            Self::Social => "social",
            Self::Map => "map",
        };
        f.write_str(name)
    }
}

/// Values a result inherits from the adapter that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultDefaults {
    /// Adapter name.
    pub engine: String,
    /// Adapter weight, used as the default score.
    pub weight: f64,
    /// Adapter's primary category.
    pub category: Category,
}

impl ResultDefaults {
    /// Creates defaults for an engine.
    #[must_use]
    pub fn new(engine: impl Into<String>, weight: f64, category: Category) -> Self {
        Self {
            engine: engine.into(),
            weight,
            category,
        }
    }
}

impl Default for ResultDefaults {
    fn default() -> Self {
        Self::new("", 1.0, Category::General)
    }
}

/// A single normalized result.
///
/// `url` and `title` are never empty. Optional fields are present only when
/// the source supplied them; `duration` is always canonical `H:MM:SS` or
/// `M:SS` text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    /// Destination URL.
    pub url: String,
    /// Display title.
    pub title: String,
    /// Snippet text, empty when the source had none.
    #[serde(default)]
    pub content: String,
    /// Relevance score.
    pub score: f64,
    /// Result category.
    pub category: Category,
    /// Name of the producing adapter.
    pub engine: String,
    /// Thumbnail image URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    /// Full-size image URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Canonical media duration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    /// Channel, uploader or publisher.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,
    /// View or download count.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub views: Option<u64>,
    /// Publication time as `YYYY-MM-DDTHH:MM:SSZ`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<String>,
    /// Embeddable player URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embed_url: Option<String>,
    /// Author names.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub authors: Vec<String>,
    /// Topics, tags or keywords.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub topics: Vec<String>,
    /// Provider-specific extras.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub metadata: HashMap<String, serde_json::Value>,
}

/// A result under construction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultCandidate {
    /// Destination URL.
    pub url: Option<String>,
    /// Display title.
    pub title: Option<String>,
    /// Snippet text.
    pub content: Option<String>,
    /// Score override.
    pub score: Option<f64>,
    /// Category override.
    pub category: Option<Category>,
    /// Thumbnail image URL.
    pub thumbnail_url: Option<String>,
    /// Full-size image URL.
    pub image_url: Option<String>,
    /// Canonical duration (already normalized).
    pub duration: Option<String>,
    /// Channel, uploader or publisher.
    pub channel: Option<String>,
    /// View count.
    pub views: Option<u64>,
    /// Normalized publication time.
    pub published_at: Option<String>,
    /// Embeddable player URL.
    pub embed_url: Option<String>,
    /// Author names.
    pub authors: Vec<String>,
    /// Topics.
    pub topics: Vec<String>,
    /// Provider-specific extras.
    pub metadata: HashMap<String, serde_json::Value>,
}

fn non_empty(value: impl Into<String>) -> Option<String> {
    let value = value.into();
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else if trimmed.len() == value.len() {
        Some(value)
    } else {
        Some(trimmed.to_string())
    }
}

impl ResultCandidate {
    /// Creates an empty candidate.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the URL.
    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = non_empty(url);
        self
    }

    /// Sets the title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = non_empty(title);
        self
    }

    /// Sets the snippet.
    #[must_use]
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = non_empty(content);
        self
    }

    /// Overrides the score.
    #[must_use]
    pub fn with_score(mut self, score: f64) -> Self {
        self.score = Some(score);
        self
    }

    /// Overrides the category.
    #[must_use]
    pub fn with_category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    /// Sets the thumbnail URL.
    #[must_use]
    pub fn with_thumbnail(mut self, url: impl Into<String>) -> Self {
        self.thumbnail_url = non_empty(url);
        self
    }

    /// Sets the full-size image URL.
    #[must_use]
    pub fn with_image(mut self, url: impl Into<String>) -> Self {
        self.image_url = non_empty(url);
        self
    }

    /// Sets the duration from any raw encoding; unparseable input leaves it absent.
    #[must_use]
    pub fn with_duration<'a>(mut self, raw: impl Into<RawDuration<'a>>) -> Self {
        self.duration = non_empty(normalize_duration(raw));
        self
    }

    /// Sets the channel.
    #[must_use]
    pub fn with_channel(mut self, channel: impl Into<String>) -> Self {
        self.channel = non_empty(channel);
        self
    }

    /// Sets the view count.
    #[must_use]
    pub fn with_views(mut self, views: u64) -> Self {
        self.views = Some(views);
        self
    }

    /// Sets the view count from human-readable text such as `1.2M views`.
    #[must_use]
    pub fn with_views_text(mut self, text: &str) -> Self {
        if !text.trim().is_empty() {
            self.views = Some(parse_magnitude(text));
        }
        self
    }

    /// Sets the publication time; unparseable input leaves it absent.
    #[must_use]
    pub fn with_published(mut self, raw: &str) -> Self {
        self.published_at = normalize_published(raw);
        self
    }

    /// Sets the embed URL.
    #[must_use]
    pub fn with_embed_url(mut self, url: impl Into<String>) -> Self {
        self.embed_url = non_empty(url);
        self
    }

    /// Adds an author.
    #[must_use]
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        if let Some(author) = non_empty(author) {
            self.authors.push(author);
        }
        self
    }

    /// Adds a topic.
    #[must_use]
    pub fn with_topic(mut self, topic: impl Into<String>) -> Self {
        if let Some(topic) = non_empty(topic) {
            self.topics.push(topic);
        }
        self
    }

    /// Adds a metadata entry.
    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    /// Checks the mandatory fields without consuming the candidate.
    pub fn check(&self) -> Result<(), ItemError> {
        if self.url.is_none() {
            return Err(ItemError::missing("url"));
        }
        if self.title.is_none() {
            return Err(ItemError::missing("title"));
        }
        Ok(())
    }

    /// Converts into a result, or `None` if `url` or `title` is missing.
    #[must_use]
    pub fn finalize(self, defaults: &ResultDefaults) -> Option<SearchResult> {
        let url = self.url?;
        let title = self.title?;
        Some(SearchResult {
            url,
            title,
            content: self.content.unwrap_or_default(),
            score: self.score.unwrap_or(defaults.weight),
            category: self.category.unwrap_or(defaults.category),
            engine: defaults.engine.clone(),
            thumbnail_url: self.thumbnail_url,
            image_url: self.image_url,
            duration: self.duration,
            channel: self.channel,
            views: self.views,
            published_at: self.published_at,
            embed_url: self.embed_url,
            authors: self.authors,
            topics: self.topics,
            metadata: self.metadata,
        })
    }
}

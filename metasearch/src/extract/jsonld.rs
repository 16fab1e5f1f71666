//! JSON-LD extraction from `<script type="application/ld+json">` blocks.

use serde_json::Value;

use super::attributes::{attribute, inner_html};
use super::selector::Selector;
use super::text::extract_text;
use crate::core::{Category, ResultCandidate};

/// schema.org types that describe a single linkable result.
const RESULT_TYPES: &[&str] = &[
    "VideoObject",
    "Article",
    "NewsArticle",
    "BlogPosting",
    "WebPage",
    "Product",
    "SoftwareSourceCode",
    "SoftwareApplication",
    "ScholarlyArticle",
    "ImageObject",
    "MusicRecording",
    "Book",
    "Recipe",
    "Event",
    "CreativeWork",
];

/// Parses every JSON-LD block in `html`.
///
/// Invalid JSON is skipped. Top-level arrays, `@graph` containers and
/// `ItemList` elements are flattened so each returned value is one object.
#[must_use]
pub fn json_ld_blocks(html: &str) -> Vec<Value> {
    let Ok(scripts) = Selector::parse("script") else {
        return Vec::new();
    };

    let mut out = Vec::new();
    for script in scripts.find_all(html) {
        let is_ld = attribute(script, "type")
            .is_some_and(|t| t.trim().eq_ignore_ascii_case("application/ld+json"));
        if !is_ld {
            continue;
        }
        let body = inner_html(script)
            .trim()
            .trim_start_matches("<!--")
            .trim_end_matches("-->")
            .trim();
        if let Ok(value) = serde_json::from_str::<Value>(body) {
            flatten(value, &mut out, 0);
        }
    }
    out
}

fn flatten(value: Value, out: &mut Vec<Value>, depth: usize) {
    if depth > 4 {
        return;
    }
    match value {
        Value::Array(items) => {
            for item in items {
                flatten(item, out, depth + 1);
            }
        }
        Value::Object(mut map) => {
            if let Some(Value::Array(graph)) = map.remove("@graph") {
                for item in graph {
                    flatten(item, out, depth + 1);
                }
                return;
            }
            if declares(map.get("@type"), "ItemList") {
                if let Some(Value::Array(elements)) = map.remove("itemListElement") {
                    for element in elements {
                        let item = match element {
                            Value::Object(mut list_item) if list_item.contains_key("item") => {
                                list_item.remove("item").unwrap_or(Value::Null)
                            }
                            other => other,
                        };
                        flatten(item, out, depth + 1);
                    }
                }
                return;
            }
            out.push(Value::Object(map));
        }
        _ => {}
    }
}

/// Whether a JSON-LD object declares `ty` in its `@type` (string or array).
#[must_use]
pub fn has_type(value: &Value, ty: &str) -> bool {
    declares(value.get("@type"), ty)
}

fn declares(types: Option<&Value>, ty: &str) -> bool {
    match types {
        Some(Value::String(s)) => s == ty,
        Some(Value::Array(types)) => types.iter().any(|t| t.as_str() == Some(ty)),
        _ => false,
    }
}

fn primary_type(value: &Value) -> Option<&str> {
    match value.get("@type")? {
        Value::String(s) => Some(s),
        Value::Array(types) => types
            .iter()
            .filter_map(Value::as_str)
            .find(|t| RESULT_TYPES.contains(t)),
        _ => None,
    }
}

/// Maps a schema.org object to a result candidate.
///
/// Returns `None` for objects whose `@type` is not a result type
/// (`Organization`, `BreadcrumbList`, ...). Mandatory fields are not checked
/// here.
#[must_use]
pub fn json_ld_candidate(value: &Value) -> Option<ResultCandidate> {
    let ty = primary_type(value).filter(|t| RESULT_TYPES.contains(t))?;

    let url = string_field(value, "url")
        .or_else(|| value.get("mainEntityOfPage").and_then(url_like))
        .or_else(|| string_field(value, "@id").filter(|id| id.starts_with("http")));

    let mut candidate = ResultCandidate::new()
        .with_url(url.unwrap_or_default())
        .with_title(
            string_field(value, "name")
                .or_else(|| string_field(value, "headline"))
                .map(|t| extract_text(&t))
                .unwrap_or_default(),
        )
        .with_content(
            string_field(value, "description")
                .or_else(|| string_field(value, "abstract"))
                .map(|d| extract_text(&d))
                .unwrap_or_default(),
        )
        .with_metadata("type", Value::String(ty.to_string()));

    if let Some(category) = category_for(ty) {
        candidate = candidate.with_category(category);
    }
    if let Some(thumb) = value
        .get("thumbnailUrl")
        .and_then(url_like)
        .or_else(|| value.get("image").and_then(url_like))
    {
        candidate = candidate.with_thumbnail(thumb);
    }
    if ty == "ImageObject" {
        if let Some(content_url) = string_field(value, "contentUrl") {
            candidate = candidate.with_image(content_url);
        }
    }
    if let Some(duration) = value.get("duration") {
        candidate = candidate.with_duration(duration);
    }
    if let Some(embed) = string_field(value, "embedUrl") {
        candidate = candidate.with_embed_url(embed);
    }
    if let Some(published) = ["uploadDate", "datePublished", "dateCreated"]
        .iter()
        .find_map(|k| string_field(value, k))
    {
        candidate = candidate.with_published(&published);
    }
    for author in names(value.get("author")) {
        candidate = candidate.with_author(author);
    }
    if let Some(channel) = names(value.get("publisher"))
        .into_iter()
        .next()
        .or_else(|| candidate.authors.first().cloned())
    {
        candidate = candidate.with_channel(channel);
    }
    if let Some(views) = view_count(value) {
        candidate = candidate.with_views(views);
    }
    for keyword in keywords(value.get("keywords")) {
        candidate = candidate.with_topic(keyword);
    }

    Some(candidate)
}

fn category_for(ty: &str) -> Option<Category> {
    match ty {
        "VideoObject" => Some(Category::Videos),
        "NewsArticle" => Some(Category::News),
        "ScholarlyArticle" => Some(Category::Science),
        "SoftwareSourceCode" | "SoftwareApplication" => Some(Category::It),
        "ImageObject" => Some(Category::Images),
        "MusicRecording" => Some(Category::Music),
        _ => None,
    }
}

fn string_field(value: &Value, key: &str) -> Option<String> {
    value
        .get(key)?
        .as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
}

/// A URL given as a string, the first of an array, or an object's `url`/`@id`.
fn url_like(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Array(items) => items.iter().find_map(url_like),
        Value::Object(_) => string_field(value, "url").or_else(|| string_field(value, "@id")),
        _ => None,
    }
}

/// Names from a string, a `{name}` object, or an array of either.
fn names(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::String(s)) if !s.trim().is_empty() => vec![s.trim().to_string()],
        Some(obj @ Value::Object(_)) => string_field(obj, "name").into_iter().collect(),
        Some(Value::Array(items)) => items.iter().flat_map(|i| names(Some(i))).collect(),
        _ => Vec::new(),
    }
}

fn keywords(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::String(s)) => s
            .split(',')
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(String::from)
            .collect(),
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(String::from)
            .collect(),
        _ => Vec::new(),
    }
}

fn count(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => super::magnitude::parse_magnitude_opt(s),
        _ => None,
    }
}

/// `interactionStatistic.userInteractionCount`, preferring a `WatchAction`.
fn view_count(value: &Value) -> Option<u64> {
    let stats = match value.get("interactionStatistic") {
        Some(Value::Array(items)) => items.iter().collect::<Vec<_>>(),
        Some(obj @ Value::Object(_)) => vec![obj],
        _ => Vec::new(),
    };
    let is_watch = |stat: &Value| {
        stat.get("interactionType").is_some_and(|t| {
            let t = t.as_str().map_or_else(|| t.get("@type").and_then(Value::as_str), Some);
            t.is_some_and(|t| t.ends_with("WatchAction"))
        })
    };
    stats
        .iter()
        .copied()
        .find(|stat| is_watch(stat))
        .or_else(|| stats.first().copied())
        .and_then(|stat| stat.get("userInteractionCount"))
        .and_then(count)
        .or_else(|| value.get("interactionCount").and_then(count))
}

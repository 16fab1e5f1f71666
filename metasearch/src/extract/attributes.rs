//! Attribute access on raw element strings.

use super::entities::decode_entities;

/// Finds the `>` that closes the tag opening at `start`, skipping quoted
/// attribute values. Returns its byte index.
///
/// An unbalanced quote falls back to the first `>` after `start`.
pub(crate) fn find_tag_end(html: &str, start: usize) -> Option<usize> {
    let mut quote: Option<u8> = None;
    for (i, &b) in html.as_bytes().iter().enumerate().skip(start + 1) {
        match quote {
            Some(q) if b == q => quote = None,
            Some(_) => {}
            None => match b {
                b'"' | b'\'' => quote = Some(b),
                b'>' => return Some(i),
                _ => {}
            },
        }
    }
    quote?;
    html.get(start + 1..)?.find('>').map(|i| start + 1 + i)
}

/// Parses the attributes of an opening tag such as `<a href="x" data-id=3 hidden>`.
///
/// Names are lowercased, values are entity-decoded, valueless attributes
/// map to an empty string. Anything unparseable is skipped.
#[must_use]
pub fn parse_attributes(open_tag: &str) -> Vec<(String, String)> {
    let inner = open_tag
        .trim()
        .trim_start_matches('<')
        .trim_end_matches('>')
        .trim_end_matches('/');
    // skip the tag name
    let Some(name_end) = inner.find(|c: char| c.is_ascii_whitespace()) else {
        return Vec::new();
    };

    let bytes = inner.as_bytes();
    let mut attrs = Vec::new();
    let mut i = name_end;

    while i < bytes.len() {
        while i < bytes.len() && (bytes[i].is_ascii_whitespace() || bytes[i] == b'/') {
            i += 1;
        }
        if i >= bytes.len() {
            break;
        }

        let name_start = i;
        while i < bytes.len()
            && !bytes[i].is_ascii_whitespace()
            && bytes[i] != b'='
            && bytes[i] != b'/'
        {
            i += 1;
        }
        let name = inner[name_start..i].to_ascii_lowercase();

        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        if i >= bytes.len() || bytes[i] != b'=' {
            if !name.is_empty() {
                attrs.push((name, String::new()));
            }
            continue;
        }
        i += 1;
        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }

        let value = if i < bytes.len() && (bytes[i] == b'"' || bytes[i] == b'\'') {
            let quote = bytes[i];
            let value_start = i + 1;
            let value_end = inner[value_start..]
                .bytes()
                .position(|b| b == quote)
                .map_or(inner.len(), |p| value_start + p);
            i = (value_end + 1).min(inner.len());
            &inner[value_start..value_end]
        } else {
            let value_start = i;
            while i < bytes.len() && !bytes[i].is_ascii_whitespace() {
                i += 1;
            }
            &inner[value_start..i]
        };

        if !name.is_empty() {
            attrs.push((name, decode_entities(value)));
        }
    }

    attrs
}

/// The opening tag of an element string, or the whole string if unterminated.
#[must_use]
pub fn open_tag(element: &str) -> &str {
    let start = element.find('<').unwrap_or(0);
    find_tag_end(element, start).map_or(element, |gt| &element[start..=gt])
}

/// Reads an attribute from an element's opening tag.
#[must_use]
pub fn attribute(element: &str, name: &str) -> Option<String> {
    let name = name.to_ascii_lowercase();
    parse_attributes(open_tag(element))
        .into_iter()
        .find(|(n, _)| *n == name)
        .map(|(_, v)| v)
}

/// Whether an opening tag's `class` attribute contains `class` as a
/// whitespace-delimited token.
#[must_use]
pub fn has_class(open_tag: &str, class: &str) -> bool {
    parse_attributes(open_tag)
        .iter()
        .filter(|(n, _)| n == "class")
        .any(|(_, v)| v.split_ascii_whitespace().any(|token| token == class))
}

/// The content between an element's opening tag and its final closing tag.
///
/// A self-closing or void element yields `""`; an element whose closing tag
/// is missing yields everything after the opening tag.
#[must_use]
pub fn inner_html(element: &str) -> &str {
    let start = element.find('<').unwrap_or(0);
    let Some(gt) = find_tag_end(element, start) else {
        return "";
    };
    if element[..=gt].ends_with("/>") {
        return "";
    }
    let body = &element[gt + 1..];
    body.rfind("</").map_or(body, |close| &body[..close])
}

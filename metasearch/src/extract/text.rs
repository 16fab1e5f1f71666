//! Visible-text extraction from HTML fragments.

use super::entities::decode_entities;

/// Tags whose whole body is invisible and removed along with the tag.
const RAW_TEXT_TAGS: &[&str] = &["script", "style"];

/// Tags that separate words when rendered; they become a single space.
const BLOCK_TAGS: &[&str] = &[
    "address", "article", "aside", "blockquote", "br", "dd", "div", "dl", "dt", "figcaption",
    "footer", "h1", "h2", "h3", "h4", "h5", "h6", "header", "hr", "li", "main", "nav", "ol",
    "p", "pre", "section", "table", "td", "th", "tr", "ul",
];

/// Extracts the visible text of an HTML fragment.
///
/// Tags are removed (block-level tags leave a space behind), `<script>` and
/// `<style>` bodies and comments are removed entirely, entities are decoded
/// and whitespace runs collapse to a single space. An unterminated `<` stops
/// tag stripping and the remainder is kept as text.
#[must_use]
pub fn extract_text(html: &str) -> String {
    collapse_whitespace(&decode_entities(&strip_tags(html)))
}

/// Removes markup without decoding entities or touching whitespace.
#[must_use]
pub fn strip_tags(html: &str) -> String {
    if !html.contains('<') {
        return html.to_string();
    }

    let lower = html.to_ascii_lowercase();
    let mut out = String::with_capacity(html.len());
    let mut pos = 0;

    while let Some(rel) = html[pos..].find('<') {
        let lt = pos + rel;
        out.push_str(&html[pos..lt]);

        if !starts_tag(&html[lt + 1..]) {
            out.push('<');
            pos = lt + 1;
            continue;
        }

        if lower[lt..].starts_with("<!--") {
            match lower[lt + 4..].find("-->") {
                Some(end) => {
                    pos = lt + 4 + end + 3;
                    continue;
                }
                None => return out,
            }
        }

        let Some(gt_rel) = html[lt..].find('>') else {
            out.push_str(&html[lt..]);
            return out;
        };
        let gt = lt + gt_rel;
        let name = tag_name(&lower[lt + 1..gt]);
        let closing = lower[lt + 1..].starts_with('/');
        pos = gt + 1;

        if !closing && RAW_TEXT_TAGS.contains(&name) && !html[..gt].ends_with('/') {
            let close = format!("</{name}");
            match lower[pos..].find(&close) {
                Some(rel_close) => {
                    let close_start = pos + rel_close;
                    pos = lower[close_start..]
                        .find('>')
                        .map_or(html.len(), |g| close_start + g + 1);
                }
                None => return out,
            }
            out.push(' ');
        } else if BLOCK_TAGS.contains(&name) {
            out.push(' ');
        }
    }

    out.push_str(&html[pos..]);
    out
}

/// Collapses whitespace runs to one space and trims.
#[must_use]
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Whether the text after a `<` looks like markup rather than a literal.
fn starts_tag(after_lt: &str) -> bool {
    after_lt
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || matches!(c, '/' | '!' | '?'))
}

/// Lowercased tag name from the inside of `<...>`.
fn tag_name(inner: &str) -> &str {
    let inner = inner.trim_start_matches('/');
    let end = inner
        .find(|c: char| c.is_ascii_whitespace() || c == '/' || c == '>')
        .unwrap_or(inner.len());
    &inner[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_nested_tags() {
        assert_eq!(
            extract_text("<div class=\"r\"><a href=\"/x\"><b>Rust</b> Lang</a></div>"),
            "Rust Lang"
        );
        assert_eq!(extract_text("<b>hello</b> world"), "hello world");
    }

    #[test]
    fn test_block_tags_separate_words() {
        assert_eq!(extract_text("<p>one</p><p>two</p>"), "one two");
        assert_eq!(extract_text("line<br/>break"), "line break");
        assert_eq!(extract_text("in<em>line</em>"), "inline");
    }

    #[test]
    fn test_script_and_style_bodies_removed() {
        let html = "<p>before</p><script type=\"text/javascript\">var x = '<b>hidden</b>';</script>\
                    <STYLE>.a { color: red }</STYLE><p>after</p>";
        assert_eq!(extract_text(html), "before after");
    }

    #[test]
    fn test_unterminated_script_drops_rest() {
        assert_eq!(extract_text("shown<script>never closed"), "shown");
    }

    #[test]
    fn test_comments_removed() {
        assert_eq!(extract_text("a<!-- <b>x</b> -->b"), "ab");
    }

    #[test]
    fn test_decodes_entities_after_stripping() {
        assert_eq!(extract_text("<i>Tom &amp; Jerry</i>&nbsp;&lt;3"), "Tom & Jerry <3");
        // an escaped tag is text, not markup
        assert_eq!(extract_text("&lt;b&gt;bold&lt;/b&gt;"), "<b>bold</b>");
    }

    #[test]
    fn test_unterminated_tag_keeps_remainder() {
        assert_eq!(extract_text("kept <a href=\"x\" broken"), "kept <a href=\"x\" broken");
    }

    #[test]
    fn test_literal_less_than() {
        assert_eq!(extract_text("1 < 2 and 3 > 2"), "1 < 2 and 3 > 2");
    }

    #[test]
    fn test_collapses_whitespace() {
        assert_eq!(extract_text("  a\n\t  b   "), "a b");
        assert_eq!(extract_text(""), "");
        assert_eq!(extract_text("<br><br>"), "");
    }
}

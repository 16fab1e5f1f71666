//! Sample provider bodies for adapter tests.

use std::fmt::Write;

/// A classic HTML result page: three `div.result` blocks (one without a
/// link), two suggestions and provider chrome links.
pub const RESULT_PAGE_HTML: &str = r#"<!DOCTYPE html>
<html>
<head><title>rust - Example Search</title></head>
<body>
<div class="header"><a href="https://search.example/settings">Settings</a></div>
<div id="results">
  <div class="result">
    <a class="result-link" href="/url?q=https%3A%2F%2Fwww.rust-lang.org%2F&amp;sa=U"><h3>Rust Programming Language</h3></a>
    <p class="snippet">A language empowering everyone to build reliable &amp; efficient software.</p>
  </div>
  <div class="result featured">
    <a class="result-link" href="https://doc.rust-lang.org/book/"><h3>Rust &amp; Cargo <b>Book</b></h3></a>
    <p class="snippet">by Steve Klabnik&nbsp;and Carol Nichols</p>
  </div>
  <div class="result">
    <p class="snippet">Sponsored placement without a link</p>
  </div>
</div>
<div class="related">
  <a class="suggestion" href="/search?q=rust+lang">rust lang</a>
  <a class="suggestion" href="/search?q=rust+book">rust <b>book</b></a>
</div>
</body>
</html>"#;

/// A page whose only machine-readable content is a JSON-LD `ItemList` of
/// two videos.
pub const JSON_LD_PAGE_HTML: &str = r#"<html>
<head>
<script type="application/ld+json">
{"@context": "https://schema.org", "@type": "ItemList", "itemListElement": [
  {"@type": "ListItem", "position": 1, "item": {
    "@type": "VideoObject", "name": "Learning Rust", "url": "https://video.example/watch/1",
    "description": "Intro &amp; basics", "thumbnailUrl": ["https://video.example/t/1.jpg"],
    "duration": "PT4M13S", "uploadDate": "2024-03-01T12:00:00Z",
    "author": {"@type": "Person", "name": "Ferris"}}},
  {"@type": "ListItem", "position": 2, "item": {
    "@type": "VideoObject", "name": "Rust Lifetimes", "url": "https://video.example/watch/2",
    "duration": "PT1H2M3S", "interactionCount": "1.5K"}}
]}
</script>
</head>
<body><div id="app"></div></body>
</html>"#;

/// A page with no result markup but plenty of outbound anchors.
pub const LINK_ONLY_HTML: &str = r#"<html><body>
<a href="https://search.example/prefs">Preferences</a>
<a href="/l/?uddg=https%3A%2F%2Fcrates.io%2Fcrates%2Fserde&amp;rut=x">serde on crates.io</a>
<a href="https://docs.rs/tokio">tokio docs</a>
<a href="https://docs.rs/tokio">tokio docs again</a>
<a href="javascript:void(0)">More</a>
</body></html>"#;

/// A CAPTCHA interstitial that also carries result-looking markup.
pub const CAPTCHA_PAGE_HTML: &str = r#"<html>
<body>
<form id="captcha-form" action="/sorry/index">
  <div class="g-recaptcha" data-sitekey="6Lc-example"></div>
</form>
<div class="result">
  <a class="result-link" href="https://bait.example/"><h3>Not a real result</h3></a>
</div>
<a class="suggestion" href="/search?q=bait">bait</a>
</body>
</html>"#;

/// A JSON video API body covering every duration and view-count encoding.
pub const VIDEO_API_JSON: &str = r#"{
  "data": {
    "items": [
      {"id": "a1", "title": "Rust in 100 Seconds", "channel": "Fireship",
       "duration": "PT2M20S", "views": "1.2M views", "published": "2021-07-12T15:00:00Z"},
      {"id": "b2", "title": "Ownership Explained", "channel": "Let's Get Rusty",
       "duration": 754, "views": 48213, "published": "1690000000"},
      {"id": "c3", "title": "Async Rust Deep Dive", "channel": "Jon Gjengset",
       "duration": "1:02:03", "views": "12K"},
      {"id": "d4", "title": "Rust Audio Session", "duration": 3723000, "views": "1,024"},
      {"id": "e5", "channel": "No Title Channel", "duration": "3:00"}
    ],
    "suggestions": ["rust tutorial", "rust async"]
  }
}"#;

/// An RSS 2.0 feed with two items.
pub const RSS_FEED_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
<channel>
  <title>Example News</title>
  <link>https://news.example/</link>
  <item>
    <title><![CDATA[Rust 1.80 released]]></title>
    <link>https://news.example/rust-1-80</link>
    <description>&lt;p&gt;LazyLock is &lt;b&gt;stable&lt;/b&gt;&lt;/p&gt;</description>
    <pubDate>Thu, 25 Jul 2024 00:00:00 GMT</pubDate>
    <author>editor@news.example</author>
  </item>
  <item>
    <title>Cargo tips</title>
    <link>https://news.example/cargo-tips</link>
    <description>Workspaces and features</description>
  </item>
</channel>
</rss>"#;

/// Builds a synthetic result page with `count` results in the
/// [`RESULT_PAGE_HTML`] layout.
#[must_use]
pub fn result_page(count: usize) -> String {
    let mut html = String::from("<html><body><div id=\"results\">\n");
    for i in 0..count {
        let _ = write!(
            html,
            "<div class=\"result\"><a class=\"result-link\" \
             href=\"/url?q=https%3A%2F%2Fsite{i}.example%2Fpage&amp;sa=U\">\
             <h3>Result {i} &amp; friends</h3></a>\
             <p class=\"snippet\">Snippet <b>{i}</b>&nbsp;with &quot;quoted&quot; text &#8230;</p>\
             </div>\n"
        );
    }
    html.push_str("</div></body></html>");
    html
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_page_size() {
        let page = result_page(3);
        assert_eq!(page.matches("class=\"result\"").count(), 3);
        assert!(page.contains("site2.example"));
    }

    #[test]
    fn test_fixtures_are_well_formed_json() {
        assert!(serde_json::from_str::<serde_json::Value>(VIDEO_API_JSON).is_ok());
    }
}

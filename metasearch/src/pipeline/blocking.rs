//! Bot-detection and blocking page detection.

/// Markers that only appear on CAPTCHA and anti-bot interstitials.
///
/// Widget and script names that ordinary result pages also embed are not
/// listed; adapters add provider-specific markers with
/// [`BlockDetector::with_marker`].
pub const DEFAULT_BLOCK_MARKERS: &[&str] = &[
    "/sorry/index",
    "<title>just a moment...</title>",
    "captcha-delivery",
    "cf-browser-verification",
    "anomaly-modal",
];

/// Cheap case-insensitive substring check run before any strategy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockDetector {
    markers: Vec<String>,
}

impl Default for BlockDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl BlockDetector {
    /// Creates a detector with the default markers.
    #[must_use]
    pub fn new() -> Self {
        Self::with_markers(DEFAULT_BLOCK_MARKERS.iter().copied())
    }

    /// Creates a detector with exactly the given markers.
    #[must_use]
    pub fn with_markers<I, S>(markers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            markers: markers
                .into_iter()
                .map(|m| m.into().to_ascii_lowercase())
                .filter(|m| !m.is_empty())
                .collect(),
        }
    }

    /// Adds a provider-specific marker.
    #[must_use]
    pub fn with_marker(mut self, marker: impl Into<String>) -> Self {
        let marker = marker.into().to_ascii_lowercase();
        if !marker.is_empty() && !self.markers.contains(&marker) {
            self.markers.push(marker);
        }
        self
    }

    /// Returns the configured markers, lowercased.
    #[must_use]
    pub fn markers(&self) -> &[String] {
        &self.markers
    }

    /// Returns the first marker found in `body`, if any.
    #[must_use]
    pub fn is_blocked(&self, body: &str) -> Option<&str> {
        if self.markers.is_empty() || body.is_empty() {
            return None;
        }
        let lower = body.to_ascii_lowercase();
        self.markers
            .iter()
            .find(|m| lower.contains(m.as_str()))
            .map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_markers() {
        let detector = BlockDetector::new();
        let sorry = r#"<form id="captcha-form" action="/sorry/index" method="post"></form>"#;
        assert_eq!(detector.is_blocked(sorry), Some("/sorry/index"));
        assert_eq!(
            detector.is_blocked("<html><head><title>Just a moment...</title></head></html>"),
            Some("<title>just a moment...</title>")
        );
        assert_eq!(
            detector.is_blocked(r#"<script src="https://geo.captcha-delivery.com/captcha/"></script>"#),
            Some("captcha-delivery")
        );
        assert_eq!(detector.is_blocked("<html>ordinary results</html>"), None);
        assert_eq!(detector.is_blocked(""), None);
    }

    #[test]
    fn test_ordinary_pages_with_widget_names_pass() {
        let detector = BlockDetector::new();
        let page = r#"<html><head><script src="/cdn-cgi/challenge-platform/scripts/jsd/main.js"></script></head>
            <body><div class="result"><a href="https://a.test">Are you a robot? A history of CAPTCHAs</a></div></body></html>"#;
        assert_eq!(detector.is_blocked(page), None);
        let api = r#"{"results": [{"title": "Component for g-recaptcha widgets", "url": "https://npm.test/x"}]}"#;
        assert_eq!(detector.is_blocked(api), None);
    }

    #[test]
    fn test_custom_markers() {
        let detector = BlockDetector::with_markers(["Access Denied"]).with_marker("rate limited");
        assert_eq!(detector.markers(), ["access denied", "rate limited"]);
        assert_eq!(detector.is_blocked("<h1>ACCESS DENIED</h1>"), Some("access denied"));
        assert_eq!(detector.is_blocked("/sorry/index"), None);

        let detector = BlockDetector::new().with_marker("g-recaptcha");
        assert_eq!(detector.is_blocked(r#"<div class="g-recaptcha">"#), Some("g-recaptcha"));
    }

    #[test]
    fn test_empty_detector_never_blocks() {
        let detector = BlockDetector::with_markers(Vec::<String>::new());
        assert_eq!(detector.is_blocked("/sorry/index"), None);
    }
}

//! Provider wire requests produced by adapters.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use url::form_urlencoded;

use crate::errors::{MetasearchError, Result};

/// HTTP method.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    /// GET request.
    #[default]
    Get,
    /// POST request.
    Post,
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Get => write!(f, "GET"),
            Self::Post => write!(f, "POST"),
        }
    }
}

/// A request the orchestrator should issue on an adapter's behalf.
///
/// Header names are stored lowercased so lookups are case-insensitive.
/// Cookies keep their insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestConfig {
    /// Absolute request URL including the query string.
    pub url: String,
    /// HTTP method.
    #[serde(default)]
    pub method: HttpMethod,
    /// Headers keyed by lowercase name.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,
    /// `name=value` cookie pairs.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cookies: Vec<String>,
    /// Request body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

impl RequestConfig {
    /// Creates a GET request.
    #[must_use]
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method: HttpMethod::Get,
            headers: BTreeMap::new(),
            cookies: Vec::new(),
            body: None,
        }
    }

    /// Creates a POST request.
    #[must_use]
    pub fn post(url: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::Post,
            ..Self::get(url)
        }
    }

    /// Adds a header, replacing any header with the same name.
    #[must_use]
    pub fn header(mut self, name: impl AsRef<str>, value: impl Into<String>) -> Self {
        self.headers
            .insert(name.as_ref().to_ascii_lowercase(), value.into());
        self
    }

    /// Appends a cookie.
    #[must_use]
    pub fn cookie(mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> Self {
        self.cookies
            .push(format!("{}={}", name.as_ref(), value.as_ref()));
        self
    }

    /// Sets a raw body.
    #[must_use]
    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Sets a form-encoded body and its content type.
    #[must_use]
    pub fn form<K, V>(self, pairs: &[(K, V)]) -> Self
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (k, v) in pairs {
            serializer.append_pair(k.as_ref(), v.as_ref());
        }
        self.header("Content-Type", "application/x-www-form-urlencoded")
            .body(serializer.finish())
    }

    /// Sets a JSON body and its content type.
    pub fn json(self, value: &serde_json::Value) -> Result<Self> {
        let body = serde_json::to_string(value)?;
        Ok(self.header("Content-Type", "application/json").body(body))
    }

    /// Looks up a header by name, ignoring case.
    #[must_use]
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// The `Cookie` header value for all cookies.
    #[must_use]
    pub fn cookie_header(&self) -> Option<String> {
        if self.cookies.is_empty() {
            None
        } else {
            Some(self.cookies.join("; "))
        }
    }
}

/// Appends encoded query parameters to a base URL.
///
/// Fails when `base` is not an absolute URL.
pub fn build_url<K, V>(base: &str, pairs: &[(K, V)]) -> Result<String>
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut url = url::Url::parse(base)
        .map_err(|e| MetasearchError::request(format!("invalid base url '{base}': {e}")))?;
    if !pairs.is_empty() {
        let mut query = url.query_pairs_mut();
        for (k, v) in pairs {
            query.append_pair(k.as_ref(), v.as_ref());
        }
    }
    Ok(url.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headers_case_insensitive() {
        let req = RequestConfig::get("https://example.com")
            .header("Accept-Language", "en-US")
            .header("ACCEPT-language", "de-DE");
        assert_eq!(req.headers.len(), 1);
        assert_eq!(req.header_value("accept-language"), Some("de-DE"));
    }

    #[test]
    fn test_cookies_keep_order() {
        let req = RequestConfig::get("https://example.com")
            .cookie("b", "2")
            .cookie("a", "1");
        assert_eq!(req.cookies, vec!["b=2".to_string(), "a=1".to_string()]);
        assert_eq!(req.cookie_header(), Some("b=2; a=1".to_string()));
    }

    #[test]
    fn test_form_body() {
        let req = RequestConfig::post("https://example.com/search")
            .form(&[("q", "rust lang"), ("s", "a&b")]);
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.body.as_deref(), Some("q=rust+lang&s=a%26b"));
        assert_eq!(
            req.header_value("content-type"),
            Some("application/x-www-form-urlencoded")
        );
    }

    #[test]
    fn test_json_body() {
        let req = RequestConfig::post("https://api.example.com")
            .json(&serde_json::json!({"query": "x"}))
            .unwrap();
        assert_eq!(req.body.as_deref(), Some(r#"{"query":"x"}"#));
    }

    #[test]
    fn test_build_url() {
        let url = build_url("https://example.com/search", &[("q", "a b"), ("page", "2")]).unwrap();
        assert_eq!(url, "https://example.com/search?q=a+b&page=2");

        assert!(build_url::<&str, &str>("not a url", &[]).is_err());
    }
}

//! End-to-end adapter tests: request building, extraction cascades and
//! multi-phase engines.

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};

    use crate::config::EngineConfig;
    use crate::core::{
        build_url, Category, EngineParams, EngineResults, RequestConfig, ResultCandidate,
    };
    use crate::engine::{validate_request, Engine};
    use crate::errors::{ItemError, MetasearchError, Result};
    use crate::extract::{
        attribute, extract_text, find_elements, first_element, page_offset, unwrap_url,
        HarvestOptions,
    };
    use crate::pipeline::{
        BlockDetector, ExtractionPipeline, ItemResult, PipelineOutcome, Strategy, StrategyKind,
    };
    use crate::testing::{
        assert_empty_results, assert_result_urls, assert_results_valid, result_page,
        CAPTCHA_PAGE_HTML, JSON_LD_PAGE_HTML, LINK_ONLY_HTML, RESULT_PAGE_HTML, VIDEO_API_JSON,
    };

    // HTML web engine: JSON-LD, then result blocks, then raw anchors.

    struct WebEngine {
        config: EngineConfig,
        pipeline: ExtractionPipeline,
    }

    fn parse_result_block(element: &str, _params: &EngineParams) -> ItemResult {
        let link = first_element(element, "a.result-link")
            .ok_or_else(|| ItemError::missing("a.result-link"))?;
        let href = attribute(&link, "href").ok_or_else(|| ItemError::missing("href"))?;
        let title = first_element(&link, "h3")
            .map(|h| extract_text(&h))
            .unwrap_or_default();
        let snippet = first_element(element, "p.snippet")
            .map(|p| extract_text(&p))
            .unwrap_or_default();
        Ok(ResultCandidate::new()
            .with_url(unwrap_url(&href))
            .with_title(title)
            .with_content(snippet))
    }

    impl WebEngine {
        fn new() -> Result<Self> {
            let config = EngineConfig::new("example web", "ew")
                .with_paging(Some(10))
                .with_weight(1.2);
            let pipeline = ExtractionPipeline::new(config.result_defaults())
                .strategy(Strategy::links(
                    "anchors",
                    HarvestOptions::new().exclude_host("search.example"),
                ))
                .strategy(Strategy::selector("results", "div.result", parse_result_block)?)
                .strategy(Strategy::json_ld("json-ld"))
                .with_suggestions(|body, _| {
                    find_elements(body, "a.suggestion")
                        .iter()
                        .map(|s| extract_text(s))
                        .collect()
                });
            Ok(Self { config, pipeline })
        }
    }

    impl Engine for WebEngine {
        fn config(&self) -> &EngineConfig {
            &self.config
        }

        fn build_request(&self, query: &str, params: &EngineParams) -> Result<RequestConfig> {
            let start = page_offset(params.page, 10).to_string();
            let url = build_url(
                "https://search.example/search",
                &[("q", query), ("start", start.as_str()), ("hl", params.language().as_str())],
            )?;
            Ok(RequestConfig::get(url)
                .header("Accept-Language", params.locale.clone())
                .cookie("CONSENT", "YES+"))
        }

        fn parse_response(&self, body: &str, params: &EngineParams) -> EngineResults {
            self.pipeline.run(body, params)
        }
    }

    #[test]
    fn test_web_engine_request() {
        let engine = WebEngine::new().unwrap();
        let params = EngineParams::new().with_page(3).with_locale("de-DE");
        let request = engine.prepare_request("rust lang", &params).unwrap();

        assert_eq!(
            request.url,
            "https://search.example/search?q=rust+lang&start=20&hl=de"
        );
        assert_eq!(request.header_value("accept-language"), Some("de-DE"));
        assert_eq!(request.cookie_header().as_deref(), Some("CONSENT=YES+"));

        let too_far = EngineParams::new().with_page(11);
        assert!(matches!(
            engine.prepare_request("rust", &too_far),
            Err(MetasearchError::InvalidParams(_))
        ));
    }

    #[test]
    fn test_web_engine_selector_results() {
        let engine = WebEngine::new().unwrap();
        let (results, report) = engine
            .pipeline
            .run_with_report(RESULT_PAGE_HTML, &EngineParams::new());

        assert_results_valid(&results);
        assert_result_urls(
            &results,
            &["https://www.rust-lang.org/", "https://doc.rust-lang.org/book/"],
        );
        assert_eq!(results.results[0].title, "Rust Programming Language");
        assert_eq!(
            results.results[0].content,
            "A language empowering everyone to build reliable & efficient software."
        );
        assert_eq!(results.results[1].title, "Rust & Cargo Book");
        assert_eq!(results.results[1].content, "by Steve Klabnik and Carol Nichols");
        assert_eq!(results.results[1].engine, "example web");
        assert_eq!(results.results[1].score, 1.2);
        assert_eq!(results.results[1].category, Category::General);
        assert_eq!(results.suggestions, vec!["rust lang", "rust book"]);

        assert_eq!(report.resolved_by(), Some("results"));
        assert_eq!(report.strategies_tried, vec!["json-ld", "results"]);
        assert_eq!(report.skipped_items, 1);
    }

    #[test]
    fn test_web_engine_json_ld_preferred() {
        let engine = WebEngine::new().unwrap();
        let (results, report) = engine
            .pipeline
            .run_with_report(JSON_LD_PAGE_HTML, &EngineParams::new());

        assert_results_valid(&results);
        assert_eq!(
            report.outcome,
            PipelineOutcome::Resolved {
                strategy: "json-ld".to_string(),
                kind: StrategyKind::JsonLd,
            }
        );

        let first = &results.results[0];
        assert_eq!(first.url, "https://video.example/watch/1");
        assert_eq!(first.category, Category::Videos);
        assert_eq!(first.content, "Intro & basics");
        assert_eq!(first.duration.as_deref(), Some("4:13"));
        assert_eq!(first.published_at.as_deref(), Some("2024-03-01T12:00:00Z"));
        assert_eq!(first.channel.as_deref(), Some("Ferris"));
        assert_eq!(
            first.thumbnail_url.as_deref(),
            Some("https://video.example/t/1.jpg")
        );

        let second = &results.results[1];
        assert_eq!(second.duration.as_deref(), Some("1:02:03"));
        assert_eq!(second.views, Some(1500));
    }

    #[test]
    fn test_web_engine_falls_back_to_links() {
        let engine = WebEngine::new().unwrap();
        let (results, report) = engine
            .pipeline
            .run_with_report(LINK_ONLY_HTML, &EngineParams::new());

        assert_result_urls(
            &results,
            &["https://crates.io/crates/serde", "https://docs.rs/tokio"],
        );
        assert_eq!(results.results[0].title, "serde on crates.io");
        assert_eq!(report.strategies_tried, vec!["json-ld", "results", "anchors"]);
        assert_eq!(
            report.outcome,
            PipelineOutcome::Resolved {
                strategy: "anchors".to_string(),
                kind: StrategyKind::Heuristic,
            }
        );
    }

    #[test]
    fn test_web_engine_captcha_short_circuit() {
        let engine = WebEngine::new().unwrap();
        let (results, report) = engine
            .pipeline
            .run_with_report(CAPTCHA_PAGE_HTML, &EngineParams::new());

        assert_empty_results(&results);
        assert!(report.is_blocked());
        assert_eq!(
            report.outcome,
            PipelineOutcome::Blocked {
                marker: "/sorry/index".to_string()
            }
        );
        assert!(report.strategies_tried.is_empty());
    }

    #[test]
    fn test_web_engine_garbage_body() {
        let engine = WebEngine::new().unwrap();
        for body in ["", "not html at all", "<div class=\"result\"><a", "{\"json\": true}"] {
            let results = engine.parse_response(body, &EngineParams::new());
            assert_empty_results(&results);
        }
    }

    // JSON video engine: every duration and view encoding in one response.

    fn parse_video(item: &Value, _params: &EngineParams) -> ItemResult {
        let id = item
            .get("id")
            .and_then(Value::as_str)
            .ok_or_else(|| ItemError::missing("id"))?;
        let text = |key: &str| item.get(key).and_then(Value::as_str).unwrap_or_default();

        let mut candidate = ResultCandidate::new()
            .with_url(format!("https://video.example/watch?v={id}"))
            .with_title(text("title"))
            .with_channel(text("channel"))
            .with_thumbnail(format!("https://video.example/thumb/{id}.jpg"))
            .with_embed_url(format!("https://video.example/embed/{id}"))
            .with_duration(item.get("duration").unwrap_or(&Value::Null))
            .with_published(text("published"));
        match item.get("views") {
            Some(Value::Number(n)) => {
                if let Some(views) = n.as_u64() {
                    candidate = candidate.with_views(views);
                }
            }
            Some(Value::String(s)) => candidate = candidate.with_views_text(s),
            _ => {}
        }
        Ok(candidate)
    }

    fn video_pipeline() -> ExtractionPipeline {
        let config = EngineConfig::new("example video", "ev").with_categories([Category::Videos]);
        ExtractionPipeline::new(config.result_defaults())
            .strategy(Strategy::json_items("api", "/data/items", parse_video))
            .with_suggestions(|body, _| {
                serde_json::from_str::<Value>(body)
                    .ok()
                    .and_then(|doc| doc.pointer("/data/suggestions").cloned())
                    .and_then(|s| serde_json::from_value(s).ok())
                    .unwrap_or_default()
            })
    }

    #[test]
    fn test_video_engine_normalization() {
        let (results, report) =
            video_pipeline().run_with_report(VIDEO_API_JSON, &EngineParams::new());

        assert_results_valid(&results);
        assert_eq!(results.len(), 4);
        assert_eq!(report.skipped_items, 1);

        let durations: Vec<_> = results
            .results
            .iter()
            .map(|r| r.duration.as_deref())
            .collect();
        assert_eq!(
            durations,
            vec![Some("2:20"), Some("12:34"), Some("1:02:03"), Some("1:02:03")]
        );

        let views: Vec<_> = results.results.iter().map(|r| r.views).collect();
        assert_eq!(
            views,
            vec![Some(1_200_000), Some(48_213), Some(12_000), Some(1_024)]
        );

        assert_eq!(
            results.results[0].published_at.as_deref(),
            Some("2021-07-12T15:00:00Z")
        );
        assert_eq!(
            results.results[1].published_at.as_deref(),
            Some("2023-07-22T04:26:40Z")
        );
        assert_eq!(results.results[2].published_at, None);
        assert_eq!(results.results[3].channel, None);
        assert!(results.results.iter().all(|r| r.category == Category::Videos));
        assert_eq!(results.suggestions, vec!["rust tutorial", "rust async"]);
    }

    #[test]
    fn test_video_engine_wrong_shape() {
        let results = video_pipeline().run(r#"{"data": {"items": "none"}}"#, &EngineParams::new());
        assert_empty_results(&results);
        let results = video_pipeline().run("<html>maintenance</html>", &EngineParams::new());
        assert_empty_results(&results);
    }

    // Two-phase engine: search phase stores a key, summary phase consumes it.

    const SEARCH_PHASE_JSON: &str = r#"{
        "web": {"results": [
            {"url": "https://www.rust-lang.org/", "title": "Rust", "description": "Fast &amp; safe"}
        ]},
        "summarizer": {"key": "sum-123"}
    }"#;

    const SUMMARY_PHASE_JSON: &str = r#"{
        "status": "complete",
        "summary": [
            {"type": "token", "data": "Rust is a systems language "},
            {"type": "token", "data": "focused on safety."}
        ],
        "enrichments": {"context": [{"url": "https://doc.rust-lang.org/", "title": "Docs"}]}
    }"#;

    struct SummaryEngine {
        config: EngineConfig,
        search: ExtractionPipeline,
        summary: ExtractionPipeline,
    }

    impl SummaryEngine {
        fn new() -> Self {
            let config =
                EngineConfig::new("example summary", "es").with_extra("api_key", json!("secret"));
            let search = ExtractionPipeline::new(config.result_defaults())
                .strategy(Strategy::json_items("web", "/web/results", |item, _| {
                    let field = |k: &str| item.get(k).and_then(Value::as_str).unwrap_or_default();
                    Ok(ResultCandidate::new()
                        .with_url(field("url"))
                        .with_title(extract_text(field("title")))
                        .with_content(extract_text(field("description"))))
                }))
                .with_engine_data(|body, _| {
                    serde_json::from_str::<Value>(body)
                        .ok()
                        .and_then(|doc| doc.pointer("/summarizer/key").cloned())
                        .map(|key| HashMap::from([("summary_key".to_string(), key)]))
                        .unwrap_or_default()
                });
            let summary = ExtractionPipeline::new(config.result_defaults()).strategy(Strategy::json(
                "summary",
                |doc, _params| {
                    let text: String = doc
                        .get("summary")
                        .and_then(Value::as_array)
                        .map(|parts| {
                            parts
                                .iter()
                                .filter_map(|p| p.get("data").and_then(Value::as_str))
                                .collect()
                        })
                        .unwrap_or_default();
                    let url = doc
                        .pointer("/enrichments/context/0/url")
                        .and_then(Value::as_str)
                        .unwrap_or_default();
                    vec![Ok(ResultCandidate::new()
                        .with_url(url)
                        .with_title("Summary")
                        .with_content(text))]
                },
            ));
            Self {
                config,
                search,
                summary,
            }
        }
    }

    impl Engine for SummaryEngine {
        fn config(&self) -> &EngineConfig {
            &self.config
        }

        fn build_request(&self, query: &str, params: &EngineParams) -> Result<RequestConfig> {
            let api_key = self
                .config
                .extra_str("api_key")
                .ok_or_else(|| MetasearchError::Config("api_key is not set".to_string()))?;
            let url = match params.engine_data_str("summary_key") {
                Some(key) => build_url("https://api.example/summarizer", &[("key", key)])?,
                None => build_url("https://api.example/web", &[("q", query), ("summary", "1")])?,
            };
            Ok(RequestConfig::get(url).header("X-Api-Key", api_key))
        }

        fn parse_response(&self, body: &str, params: &EngineParams) -> EngineResults {
            if params.engine_data_str("summary_key").is_some() {
                self.summary.run(body, params)
            } else {
                self.search.run(body, params)
            }
        }
    }

    #[test]
    fn test_two_phase_engine() {
        let engine = SummaryEngine::new();
        let params = EngineParams::new();

        let request = engine.prepare_request("rust", &params).unwrap();
        assert_eq!(request.url, "https://api.example/web?q=rust&summary=1");
        assert_eq!(request.header_value("x-api-key"), Some("secret"));

        let phase_one = engine.parse_response(SEARCH_PHASE_JSON, &params);
        assert_result_urls(&phase_one, &["https://www.rust-lang.org/"]);
        assert_eq!(phase_one.results[0].content, "Fast & safe");
        let key = phase_one.engine_data["summary_key"].clone();
        assert_eq!(key, json!("sum-123"));

        let params = params.with_engine_data("summary_key", key);
        let request = engine.prepare_request("rust", &params).unwrap();
        assert_eq!(request.url, "https://api.example/summarizer?key=sum-123");

        let phase_two = engine.parse_response(SUMMARY_PHASE_JSON, &params);
        assert_results_valid(&phase_two);
        assert_eq!(phase_two.results[0].title, "Summary");
        assert_eq!(
            phase_two.results[0].content,
            "Rust is a systems language focused on safety."
        );
        assert!(phase_two.engine_data.is_empty());
    }

    #[test]
    fn test_two_phase_engine_without_api_key() {
        let mut engine = SummaryEngine::new();
        engine.config.extra.clear();
        assert!(matches!(
            engine.prepare_request("rust", &EngineParams::new()),
            Err(MetasearchError::Config(_))
        ));
    }

    // Short-circuiting.

    fn counting(name: &str, kind: StrategyKind, yields: usize, calls: Arc<AtomicUsize>) -> Strategy {
        Strategy::custom(name, kind, move |_, _| {
            calls.fetch_add(1, Ordering::SeqCst);
            (0..yields)
                .map(|i| {
                    Ok(ResultCandidate::new()
                        .with_url(format!("https://example.com/{i}"))
                        .with_title(format!("Result {i}")))
                })
                .collect()
        })
    }

    #[test]
    fn test_later_strategies_not_run_after_success() {
        let structured = Arc::new(AtomicUsize::new(0));
        let selector = Arc::new(AtomicUsize::new(0));
        let heuristic = Arc::new(AtomicUsize::new(0));
        let pipeline = ExtractionPipeline::new(EngineConfig::new("count", "c").result_defaults())
            .strategy(counting("heuristic", StrategyKind::Heuristic, 9, Arc::clone(&heuristic)))
            .strategy(counting("selector", StrategyKind::Selector, 2, Arc::clone(&selector)))
            .strategy(counting("api", StrategyKind::StructuredJson, 0, Arc::clone(&structured)));

        let results = pipeline.run("<html></html>", &EngineParams::new());

        assert_eq!(results.len(), 2);
        assert_eq!(structured.load(Ordering::SeqCst), 1);
        assert_eq!(selector.load(Ordering::SeqCst), 1);
        assert_eq!(heuristic.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_blocked_body_runs_no_strategy() {
        let calls = Arc::new(AtomicUsize::new(0));
        let pipeline = ExtractionPipeline::new(EngineConfig::new("count", "c").result_defaults())
            .with_block_detector(BlockDetector::new())
            .strategy(counting("api", StrategyKind::StructuredJson, 3, Arc::clone(&calls)));

        assert_empty_results(&pipeline.run(CAPTCHA_PAGE_HTML, &EngineParams::new()));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_disabled_engine_rejected_before_request() {
        let mut engine = WebEngine::new().unwrap();
        engine.config = engine.config.clone().with_disabled(true);
        assert!(matches!(
            validate_request(&engine, "rust", &EngineParams::new()),
            Err(MetasearchError::EngineDisabled(_))
        ));
    }

    #[cfg(feature = "feeds")]
    #[test]
    fn test_feed_engine() {
        use crate::extract::feed_items;
        use crate::testing::RSS_FEED_XML;

        let config = EngineConfig::new("example news", "en").with_categories([Category::News]);
        let pipeline = ExtractionPipeline::new(config.result_defaults()).strategy(Strategy::custom(
            "rss",
            StrategyKind::Selector,
            |body, _| {
                feed_items(body)
                    .into_iter()
                    .map(|item| Ok(item.into_candidate()))
                    .collect()
            },
        ));

        let results = pipeline.run(RSS_FEED_XML, &EngineParams::new());
        assert_results_valid(&results);
        assert_result_urls(
            &results,
            &["https://news.example/rust-1-80", "https://news.example/cargo-tips"],
        );
        assert_eq!(results.results[0].title, "Rust 1.80 released");
        assert_eq!(results.results[0].content, "LazyLock is stable");
        assert_eq!(
            results.results[0].published_at.as_deref(),
            Some("2024-07-25T00:00:00Z")
        );
        assert_eq!(results.results[1].category, Category::News);
    }

    // Concurrency: one pipeline shared by many tasks.

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_engine_shared_across_tasks() {
        let engine = Arc::new(WebEngine::new().unwrap());

        let handles: Vec<_> = (0..32_usize)
            .map(|i| {
                let engine = Arc::clone(&engine);
                tokio::task::spawn_blocking(move || {
                    let body = if i % 4 == 0 {
                        CAPTCHA_PAGE_HTML.to_string()
                    } else {
                        result_page(i)
                    };
                    (i, engine.parse_response(&body, &EngineParams::new()))
                })
            })
            .collect();

        for joined in futures::future::join_all(handles).await {
            let (i, results) = joined.unwrap();
            if i % 4 == 0 {
                assert_empty_results(&results);
            } else {
                assert_eq!(results.len(), i);
                assert_results_valid(&results);
                assert_eq!(results.results[0].url, "https://site0.example/page");
                assert_eq!(results.results[0].title, "Result 0 & friends");
            }
        }
    }
}

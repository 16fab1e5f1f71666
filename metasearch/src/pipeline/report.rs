//! What happened during one pipeline run.

use serde::{Deserialize, Serialize};

use super::strategy::StrategyKind;

/// How a run ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum PipelineOutcome {
    /// The body matched a bot-detection marker; no strategy ran.
    Blocked {
        /// The marker that matched.
        marker: String,
    },
    /// A strategy produced results.
    Resolved {
        /// Name of the winning strategy.
        strategy: String,
        /// Its reliability class.
        kind: StrategyKind,
    },
    /// Every strategy came back empty.
    Empty,
}

/// Diagnostics for one run, for orchestrators that log on their own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineReport {
    /// How the run ended.
    #[serde(flatten)]
    pub outcome: PipelineOutcome,
    /// Strategies executed, in order.
    pub strategies_tried: Vec<String>,
    /// Items dropped across all executed strategies.
    pub skipped_items: usize,
    /// Wall time in milliseconds.
    pub duration_ms: f64,
}

impl PipelineReport {
    /// Whether the body was a blocking page.
    #[must_use]
    pub fn is_blocked(&self) -> bool {
        matches!(self.outcome, PipelineOutcome::Blocked { .. })
    }

    /// Name of the winning strategy, if any.
    #[must_use]
    pub fn resolved_by(&self) -> Option<&str> {
        match &self.outcome {
            PipelineOutcome::Resolved { strategy, .. } => Some(strategy),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_serialization() {
        let report = PipelineReport {
            outcome: PipelineOutcome::Resolved {
                strategy: "json-ld".to_string(),
                kind: StrategyKind::JsonLd,
            },
            strategies_tried: vec!["api".to_string(), "json-ld".to_string()],
            skipped_items: 1,
            duration_ms: 0.5,
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["outcome"], "resolved");
        assert_eq!(json["strategy"], "json-ld");
        assert_eq!(json["kind"], "json_ld");
        assert_eq!(report.resolved_by(), Some("json-ld"));
        assert!(!report.is_blocked());
    }

    #[test]
    fn test_blocked_report() {
        let report = PipelineReport {
            outcome: PipelineOutcome::Blocked {
                marker: "/sorry/index".to_string(),
            },
            strategies_tried: Vec::new(),
            skipped_items: 0,
            duration_ms: 0.0,
        };
        assert!(report.is_blocked());
        assert_eq!(report.resolved_by(), None);
    }
}

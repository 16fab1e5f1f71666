//! Global `tracing` subscriber setup for hosts that embed the toolkit.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::errors::{MetasearchError, Result};

/// Output encoding for log lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per line.
    Json,
}

impl FromStr for LogFormat {
    type Err = MetasearchError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "plain" | "pretty" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(MetasearchError::Config(format!("unknown log format '{other}'"))),
        }
    }
}

/// Installs a global fmt subscriber.
///
/// `RUST_LOG` overrides `default_filter` when set. A subscriber that is
/// already installed is left in place and the call succeeds.
pub fn init_tracing(default_filter: &str, format: LogFormat) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .map_err(|e| MetasearchError::Config(format!("invalid log filter: {e}")))?;

    let installed = match format {
        LogFormat::Text => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true))
            .try_init(),
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .try_init(),
    };

    if let Err(e) = installed {
        tracing::debug!(error = %e, "Tracing subscriber already installed");
    }
    Ok(())
}

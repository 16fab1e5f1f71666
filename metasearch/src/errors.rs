//! Error types for the metasearch toolkit.
//!
//! Errors only surface at construction boundaries: building a request,
//! validating query parameters, loading configuration. The parse path
//! (`parse_response`, the `extract` functions, the extraction pipeline)
//! never returns an error; malformed input degrades to an empty result.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// The main error type for metasearch operations.
#[derive(Debug, Error)]
pub enum MetasearchError {
    /// Query parameters are out of range or inconsistent.
    #[error("Invalid parameters: {0}")]
    InvalidParams(String),

    /// A selector string is not of the form `tag` or `tag.class`.
    #[error("Invalid selector '{0}': expected `tag` or `tag.class`")]
    InvalidSelector(String),

    /// An adapter could not build its request.
    #[error("Request error: {0}")]
    Request(String),

    /// The engine is disabled in its configuration.
    #[error("Engine '{0}' is disabled")]
    EngineDisabled(String),

    /// Configuration could not be loaded or is invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl MetasearchError {
    /// Creates an invalid-parameters error.
    #[must_use]
    pub fn invalid_params(message: impl Into<String>) -> Self {
        Self::InvalidParams(message.into())
    }

    /// Creates a request error.
    #[must_use]
    pub fn request(message: impl Into<String>) -> Self {
        Self::Request(message.into())
    }
}

/// Why a single item inside a strategy was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemErrorKind {
    /// A mandatory field is absent or empty.
    MissingField,
    /// A field is present but its value cannot be used.
    InvalidValue,
    /// The item's markup or JSON could not be interpreted at all.
    Malformed,
}

impl fmt::Display for ItemErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingField => write!(f, "missing field"),
            Self::InvalidValue => write!(f, "invalid value"),
            Self::Malformed => write!(f, "malformed item"),
        }
    }
}

/// A per-item extraction failure.
///
/// Strategies report these instead of aborting; the pipeline drops the
/// item and keeps its siblings.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{kind}: {detail}")]
pub struct ItemError {
    /// The failure category.
    pub kind: ItemErrorKind,
    /// Field name or free-form detail.
    pub detail: String,
}

impl ItemError {
    /// A mandatory field is absent.
    #[must_use]
    pub fn missing(field: impl Into<String>) -> Self {
        Self {
            kind: ItemErrorKind::MissingField,
            detail: field.into(),
        }
    }

    /// A field holds an unusable value.
    #[must_use]
    pub fn invalid(detail: impl Into<String>) -> Self {
        Self {
            kind: ItemErrorKind::InvalidValue,
            detail: detail.into(),
        }
    }

    /// The item could not be interpreted.
    #[must_use]
    pub fn malformed(detail: impl Into<String>) -> Self {
        Self {
            kind: ItemErrorKind::Malformed,
            detail: detail.into(),
        }
    }
}

/// Convenience alias for fallible construction-boundary operations.
pub type Result<T, E = MetasearchError> = std::result::Result<T, E>;

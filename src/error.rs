//! Error types for quality scoring.
//!
//! Degenerate input (empty documents, zero tokens) is never an error. Errors
//! are reserved for configuration problems, which surface when a scorer or
//! document is built rather than per scored span.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while configuring or running quality scoring.
#[derive(Debug, Error)]
pub enum QualityError {
    /// An n-gram range with `lo == 0` or `lo > hi`.
    #[error("invalid n-gram range ({lo}, {hi}): expected 1 <= lo <= hi")]
    InvalidNgramRange { lo: usize, hi: usize },

    /// A configuration value that cannot be used.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A threshold references a metric that is never produced.
    #[error("unknown metric in thresholds: {0}")]
    UnknownMetric(String),

    /// A threshold whose kind or shape does not fit the metric value.
    #[error("threshold mismatch for {metric}: {reason}")]
    ThresholdMismatch { metric: String, reason: String },

    /// A token whose offsets do not fit the document text.
    #[error("invalid token at index {index}: {reason}")]
    InvalidToken { index: usize, reason: String },

    /// Reading a configuration or vocabulary file failed.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A configuration file could not be parsed.
    #[error("failed to parse {}: {message}", path.display())]
    ConfigParse { path: PathBuf, message: String },
}

impl QualityError {
    pub(crate) fn mismatch(metric: &str, reason: impl Into<String>) -> Self {
        QualityError::ThresholdMismatch {
            metric: metric.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result type for quality operations.
pub type QualityResult<T> = Result<T, QualityError>;

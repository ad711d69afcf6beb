//! Structured error types shared across QRE crates.

use std::collections::BTreeMap;
use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured payload attached to every [`QreError`] variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Stable machine readable error code.
    pub code: String,
    /// Human readable diagnostic message.
    pub message: String,
    /// Contextual key value pairs (molecule ids, paths, hashes).
    #[serde(default)]
    pub context: BTreeMap<String, String>,
    /// Optional hint that may help the caller resolve the issue.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ErrorInfo {
    /// Creates a new error payload with the provided code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            context: BTreeMap::new(),
            hint: None,
        }
    }

    /// Adds a context entry to the payload.
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    /// Sets a human readable hint for remediation.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// Canonical error type for the QRE engine.
///
/// `Config`, `Storage` and `Schema` are fatal for a batch invocation;
/// `Compute` is recoverable per task and never escapes the batch loop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "family", content = "detail")]
pub enum QreError {
    /// Invalid or incomplete sweep configuration (missing grid axis, empty list, missing input file).
    #[error("config error: {0}")]
    Config(ErrorInfo),
    /// External resource estimation failed or timed out for a single task.
    #[error("compute error: {0}")]
    Compute(ErrorInfo),
    /// A result row's columns disagree with the destination's established header.
    #[error("schema error: {0}")]
    Schema(ErrorInfo),
    /// Marker or table storage could not be created or written.
    #[error("storage error: {0}")]
    Storage(ErrorInfo),
    /// Serialization and canonical encoding errors.
    #[error("serde error: {0}")]
    Serde(ErrorInfo),
}

impl Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code: {})", self.message, self.code)?;
        if !self.context.is_empty() {
            write!(f, " | context: [")?;
            for (idx, (key, value)) in self.context.iter().enumerate() {
                if idx > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{key}={value}")?;
            }
            write!(f, "]")?;
        }
        if let Some(hint) = &self.hint {
            write!(f, " | hint: {hint}")?;
        }
        Ok(())
    }
}

impl QreError {
    /// Returns a reference to the payload describing the error.
    pub fn info(&self) -> &ErrorInfo {
        match self {
            QreError::Config(info)
            | QreError::Compute(info)
            | QreError::Schema(info)
            | QreError::Storage(info)
            | QreError::Serde(info) => info,
        }
    }

    /// Whether the error aborts a batch run (everything except per-task compute failures).
    pub fn is_fatal(&self) -> bool {
        !matches!(self, QreError::Compute(_))
    }
}

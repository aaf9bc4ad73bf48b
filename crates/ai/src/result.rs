use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use thiserror::Error;

/// Result of an AI job.
///
/// Informational only: it can be displayed or stored by higher layers, but no
/// forecast figure is ever derived from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiResult {
    /// Primary score (job-specific meaning).
    pub score: f64,

    /// Confidence in \[0, 1\].
    pub confidence: f64,

    /// Generated text, if the job produces any.
    pub explanation: Option<String>,

    /// Free-form metadata (job kind, inputs echoed back, generation parameters).
    pub metadata: JsonValue,
}

impl AiResult {
    pub fn new(score: f64, confidence: f64) -> Self {
        Self {
            score,
            confidence,
            explanation: None,
            metadata: JsonValue::Null,
        }
    }

    pub fn with_explanation(mut self, explanation: impl Into<String>) -> Self {
        self.explanation = Some(explanation.into());
        self
    }

    pub fn with_metadata(mut self, metadata: JsonValue) -> Self {
        self.metadata = metadata;
        self
    }
}

#[derive(Debug, Error)]
pub enum AiError {
    #[error("invalid job input: {0}")]
    InvalidInput(String),

    #[error("completion service failed: {0}")]
    CompletionFailed(String),

    #[error("inference failed: {0}")]
    InferenceFailed(String),
}

//! Summary types

use serde::{Deserialize, Serialize};

/// How a summary was produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SummaryType {
    /// Abstractive summary from the generative model
    AiGenerated,
    /// Verbatim excerpts chosen by the fallback
    Extractive,
    /// Summarization failed; the summary holds the message
    Error,
    /// Input too short to summarize
    InsufficientContent,
}

impl SummaryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AiGenerated => "ai_generated",
            Self::Extractive => "extractive",
            Self::Error => "error",
            Self::InsufficientContent => "insufficient_content",
        }
    }
}

/// Output of the summarization stage
#[derive(Debug, Clone, Serialize)]
pub struct SummaryResult {
    pub summary: String,
    pub key_points: Vec<String>,
    pub summary_type: SummaryType,
    /// Input length in characters
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_length: Option<usize>,
    /// Summary length in characters
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary_length: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SummaryResult {
    pub fn insufficient_content() -> Self {
        Self {
            summary: "Text too short for meaningful summarization.".to_string(),
            key_points: Vec::new(),
            summary_type: SummaryType::InsufficientContent,
            original_length: None,
            summary_length: None,
            error: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            summary: format!("Summarization failed: {}", message),
            key_points: Vec::new(),
            summary_type: SummaryType::Error,
            original_length: None,
            summary_length: None,
            error: Some(message),
        }
    }
}

/// Summarization errors
#[derive(Debug, thiserror::Error)]
pub enum SummaryError {
    #[error("Summary model not available: {0}")]
    ModelUnavailable(String),

    #[error("Summary model request failed: {0}")]
    Request(String),

    #[error("Summary model returned an empty summary")]
    EmptySummary,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_type_wire_names() {
        for ty in [
            SummaryType::AiGenerated,
            SummaryType::Extractive,
            SummaryType::Error,
            SummaryType::InsufficientContent,
        ] {
            let json = serde_json::to_string(&ty).unwrap();
            assert_eq!(json, format!("\"{}\"", ty.as_str()));
        }
    }

    #[test]
    fn test_failed_result_carries_message() {
        let result = SummaryResult::failed("model crashed");
        assert_eq!(result.summary_type, SummaryType::Error);
        assert_eq!(result.error.as_deref(), Some("model crashed"));
        assert!(result.summary.contains("model crashed"));
        assert!(result.key_points.is_empty());
    }
}

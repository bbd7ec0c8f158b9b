//! OCR Types
//!
//! Defines types shared by the OCR providers and service.

use serde::{Deserialize, Serialize};

/// OCR provider type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OcrProvider {
    /// Tesseract OCR (local child process)
    Tesseract,
    /// Ollama vision model (local LLM)
    Ollama,
}

impl Default for OcrProvider {
    fn default() -> Self {
        Self::Tesseract
    }
}

/// OCR result
#[derive(Debug, Clone, Serialize)]
pub struct OcrResult {
    /// Recognized text
    pub text: String,
    /// Confidence score (0-100)
    pub confidence: f64,
    /// Provider used
    pub provider: OcrProvider,
}

/// OCR error types
#[derive(Debug, thiserror::Error)]
pub enum OcrError {
    #[error("OCR provider not available: {0}")]
    ProviderNotAvailable(String),

    #[error("Failed to read image: {0}")]
    ImageReadError(String),

    #[error("OCR processing failed: {0}")]
    ProcessingError(String),

    #[error("Invalid language code: {0}")]
    InvalidLanguage(String),

    #[error("API error: {0}")]
    ApiError(String),
}

/// Validate a tesseract language string such as `mal` or `mal+eng`
///
/// Only ASCII letters, digits, `_` and `+` are accepted so the value can be
/// passed to a child process as a single argument.
pub fn validate_language(lang: &str) -> Result<(), OcrError> {
    let valid = !lang.is_empty()
        && lang.len() <= 64
        && lang
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '+');

    if valid {
        Ok(())
    } else {
        Err(OcrError::InvalidLanguage(lang.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_language() {
        assert!(validate_language("mal").is_ok());
        assert!(validate_language("mal+eng").is_ok());
        assert!(validate_language("chi_sim").is_ok());
        assert!(validate_language("").is_err());
        assert!(validate_language("mal --psm 0").is_err());
        assert!(validate_language("-l").is_err());
    }

    #[test]
    fn test_provider_serialization() {
        let json = serde_json::to_string(&OcrProvider::Tesseract).unwrap();
        assert_eq!(json, "\"tesseract\"");
        let parsed: OcrProvider = serde_json::from_str("\"ollama\"").unwrap();
        assert_eq!(parsed, OcrProvider::Ollama);
    }
}

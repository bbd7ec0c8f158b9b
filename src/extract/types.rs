//! Extraction types

use std::path::Path;

use serde::Serialize;

/// Extensions accepted for upload, with their leading dot
pub const SUPPORTED_EXTENSIONS: &[&str] = &[".pdf", ".jpg", ".jpeg", ".png", ".tiff", ".txt"];

/// How a file's text is obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    /// OCR the image directly
    Image,
    /// Embedded text layer, OCR fallback for scans
    Pdf,
    /// Read as UTF-8
    Text,
}

impl FileKind {
    /// Classify a lowercase extension with its leading dot (`".png"`)
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            ".jpg" | ".jpeg" | ".png" | ".tiff" => Some(Self::Image),
            ".pdf" => Some(Self::Pdf),
            ".txt" => Some(Self::Text),
            _ => None,
        }
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        Self::from_extension(&extension_of(&path.to_string_lossy()))
    }
}

/// Lowercased extension of a file name including the dot, or `""`
pub fn extension_of(file_name: &str) -> String {
    let name = file_name.rsplit(['/', '\\']).next().unwrap_or(file_name);

    match name.rfind('.') {
        // A leading dot marks a hidden file, not an extension
        Some(index) if index > 0 => name[index..].to_ascii_lowercase(),
        _ => String::new(),
    }
}

/// Output of the extraction-translation stage
#[derive(Debug, Clone, Serialize)]
pub struct ExtractionResult {
    pub original_text: String,
    pub language: String,
    pub translated_text: String,
    /// Seconds spent in the stage
    pub processing_time: f64,
    pub confidence: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ExtractionResult {
    /// No text could be obtained from the file
    pub fn empty(processing_time: f64) -> Self {
        Self {
            original_text: String::new(),
            language: "unknown".to_string(),
            translated_text: String::new(),
            processing_time,
            confidence: 0.0,
            error: None,
        }
    }

    /// The stage failed; the message is reported as data
    pub fn failed(message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            original_text: String::new(),
            language: "error".to_string(),
            translated_text: format!("Processing error: {}", message),
            processing_time: 0.0,
            confidence: 0.0,
            error: Some(message),
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// Failures inside the extraction stage
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("Unsupported file type: {0}")]
    UnsupportedFileType(String),

    #[error("Failed to read {path}: {message}")]
    Read { path: String, message: String },

    #[error(transparent)]
    Ocr(#[from] crate::ocr::OcrError),

    #[error(transparent)]
    Pdf(#[from] crate::pdf::PdfError),

    #[error(transparent)]
    Translate(#[from] crate::translate::TranslateError),
}

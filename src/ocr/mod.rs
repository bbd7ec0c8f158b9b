//! OCR Module
//!
//! Provides OCR (Optical Character Recognition) for uploaded images and
//! scanned PDF pages.
//!
//! Supports multiple backends:
//! - Tesseract (local, requires installation with the `mal` language pack)
//! - Ollama vision models (local LLM)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use kmrl_ocr_server::ocr::OcrService;
//!
//! let service = OcrService::new(&config.ocr);
//!
//! // Check available providers
//! let providers = service.available_providers().await;
//!
//! // OCR an uploaded image
//! let result = service.recognize_file(Path::new("uploads/scan.png")).await?;
//! ```

mod provider;
mod service;
mod types;

pub use provider::{OcrProviderTrait, OllamaProvider, TesseractProvider};
pub use service::OcrService;
pub use types::{validate_language, OcrError, OcrProvider, OcrResult};

#[cfg(test)]
pub(crate) use provider::MockProvider;

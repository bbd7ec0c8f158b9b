//! OCR Service
//!
//! Orchestrates OCR providers, trying each configured backend in order.

use std::path::Path;
use std::sync::Arc;

use super::{
    provider::{OcrProviderTrait, OllamaProvider, TesseractProvider},
    types::{OcrError, OcrProvider, OcrResult},
};
use crate::config::OcrConfig;

/// OCR service used by the extraction pipeline
pub struct OcrService {
    language: String,
    providers: Vec<Arc<dyn OcrProviderTrait>>,
}

impl OcrService {
    /// Create a new OCR service from configuration
    pub fn new(config: &OcrConfig) -> Self {
        let providers = config
            .providers
            .iter()
            .map(|provider| -> Arc<dyn OcrProviderTrait> {
                match provider {
                    OcrProvider::Tesseract => Arc::new(TesseractProvider::new(&config.tesseract_cmd)),
                    OcrProvider::Ollama => Arc::new(OllamaProvider::new(
                        &config.ollama_url,
                        &config.ollama_model,
                    )),
                }
            })
            .collect();

        Self {
            language: config.language.clone(),
            providers,
        }
    }

    /// Create a service with explicit providers
    pub fn with_providers(language: &str, providers: Vec<Arc<dyn OcrProviderTrait>>) -> Self {
        Self {
            language: language.to_string(),
            providers,
        }
    }

    /// OCR language pack in use
    pub fn language(&self) -> &str {
        &self.language
    }

    /// Get available providers
    pub async fn available_providers(&self) -> Vec<OcrProvider> {
        let mut available = Vec::new();
        for provider in &self.providers {
            if provider.is_available().await {
                available.push(provider.provider_type());
            }
        }
        available
    }

    /// Perform OCR on encoded image bytes
    ///
    /// Providers are tried in configured order; the first success wins.
    pub async fn recognize(&self, image_data: &[u8]) -> Result<OcrResult, OcrError> {
        let mut last_error = None;

        for provider in &self.providers {
            match provider.recognize(image_data, &self.language).await {
                Ok(result) => {
                    tracing::debug!(
                        provider = ?provider.provider_type(),
                        chars = result.text.chars().count(),
                        "OCR completed"
                    );
                    return Ok(result);
                }
                Err(e) => {
                    tracing::warn!(
                        "OCR provider {:?} failed: {}, trying next",
                        provider.provider_type(),
                        e
                    );
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| {
            OcrError::ProviderNotAvailable("No OCR providers configured".to_string())
        }))
    }

    /// Read an image file and OCR it
    pub async fn recognize_file(&self, path: &Path) -> Result<OcrResult, OcrError> {
        let data = tokio::fs::read(path).await.map_err(|e| {
            OcrError::ImageReadError(format!("{}: {}", path.display(), e))
        })?;

        self.recognize(&data).await
    }

    /// OCR a sequence of rendered pages, joining the text with blank lines
    pub async fn recognize_pages(&self, pages: &[Vec<u8>]) -> Result<String, OcrError> {
        let mut texts = Vec::with_capacity(pages.len());

        for (index, page) in pages.iter().enumerate() {
            let result = self.recognize(page).await?;
            tracing::debug!(page = index + 1, chars = result.text.len(), "OCR page done");
            if !result.text.is_empty() {
                texts.push(result.text);
            }
        }

        Ok(texts.join("\n\n"))
    }
}

//! OCR Providers
//!
//! Defines the provider trait and implementations for different OCR backends.

use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use super::types::{validate_language, OcrError, OcrProvider, OcrResult};

/// OCR provider trait
#[async_trait]
pub trait OcrProviderTrait: Send + Sync {
    /// Get the provider type
    fn provider_type(&self) -> OcrProvider;

    /// Check if the provider is available
    async fn is_available(&self) -> bool;

    /// Perform OCR on an encoded image (PNG, JPEG, TIFF)
    async fn recognize(&self, image_data: &[u8], language: &str) -> Result<OcrResult, OcrError>;
}

/// Tesseract OCR provider
///
/// Runs the tesseract executable with the image on stdin and reads the
/// recognized text from stdout, so no temporary files are needed.
pub struct TesseractProvider {
    /// Executable name or absolute path
    command: String,
}

impl TesseractProvider {
    pub fn new(command: &str) -> Self {
        Self {
            command: command.to_string(),
        }
    }
}

#[async_trait]
impl OcrProviderTrait for TesseractProvider {
    fn provider_type(&self) -> OcrProvider {
        OcrProvider::Tesseract
    }

    async fn is_available(&self) -> bool {
        let result = Command::new(&self.command)
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await;

        matches!(result, Ok(status) if status.success())
    }

    async fn recognize(&self, image_data: &[u8], language: &str) -> Result<OcrResult, OcrError> {
        validate_language(language)?;

        let mut child = Command::new(&self.command)
            .arg("stdin")
            .arg("stdout")
            .arg("-l")
            .arg(language)
            .arg("--oem")
            .arg("3")
            .arg("--psm")
            .arg("3")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| OcrError::ProcessingError(format!("Failed to run tesseract: {}", e)))?;

        if let Some(mut stdin) = child.stdin.take() {
            if let Err(e) = stdin.write_all(image_data).await {
                let _ = child.kill().await;
                return Err(OcrError::ProcessingError(format!(
                    "Failed to write to tesseract stdin: {}",
                    e
                )));
            }
            if let Err(e) = stdin.flush().await {
                let _ = child.kill().await;
                return Err(OcrError::ProcessingError(format!(
                    "Failed to flush tesseract stdin: {}",
                    e
                )));
            }
            drop(stdin);
        }

        let output = child.wait_with_output().await.map_err(|e| {
            OcrError::ProcessingError(format!("Failed to wait for tesseract: {}", e))
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(OcrError::ProcessingError(format!(
                "Tesseract failed: {}",
                stderr.trim()
            )));
        }

        Ok(OcrResult {
            text: String::from_utf8_lossy(&output.stdout).trim().to_string(),
            confidence: 80.0, // Plain text output carries no confidence
            provider: OcrProvider::Tesseract,
        })
    }
}

/// Ollama vision model provider
pub struct OllamaProvider {
    client: reqwest::Client,
    /// Ollama API URL
    base_url: String,
    /// Model name (e.g., "llava", "bakllava")
    model: String,
}

/// Upper bound on one vision OCR request
const OLLAMA_REQUEST_TIMEOUT: Duration = Duration::from_secs(120);
/// Availability checks back the health endpoint and must answer quickly
const OLLAMA_HEALTH_TIMEOUT: Duration = Duration::from_secs(5);

impl OllamaProvider {
    pub fn new(base_url: &str, model: &str) -> Self {
        let client = reqwest::Client::builder()
            .timeout(OLLAMA_REQUEST_TIMEOUT)
            .connect_timeout(OLLAMA_HEALTH_TIMEOUT)
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!("Failed to build Ollama HTTP client ({}), using defaults", e);
                reqwest::Client::new()
            });

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
        }
    }
}

/// Human-readable name for a tesseract language pack, used in LLM prompts
fn language_name(tesseract_lang: &str) -> &str {
    match tesseract_lang.split('+').next().unwrap_or_default() {
        "mal" => "Malayalam",
        "eng" => "English",
        "tam" => "Tamil",
        "hin" => "Hindi",
        other => other,
    }
}

#[async_trait]
impl OcrProviderTrait for OllamaProvider {
    fn provider_type(&self) -> OcrProvider {
        OcrProvider::Ollama
    }

    async fn is_available(&self) -> bool {
        let url = format!("{}/api/tags", self.base_url);

        match self
            .client
            .get(&url)
            .timeout(OLLAMA_HEALTH_TIMEOUT)
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }

    async fn recognize(&self, image_data: &[u8], language: &str) -> Result<OcrResult, OcrError> {
        use base64::Engine;

        let url = format!("{}/api/generate", self.base_url);
        let image_base64 = base64::engine::general_purpose::STANDARD.encode(image_data);

        let prompt = format!(
            "Extract all text from this image exactly as written. The text is in {}. \
             Return only the extracted text, nothing else.",
            language_name(language)
        );

        let request = serde_json::json!({
            "model": self.model,
            "prompt": prompt,
            "images": [image_base64],
            "stream": false
        });

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| OcrError::ApiError(format!("Failed to call Ollama: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(OcrError::ApiError(format!(
                "Ollama returned {}: {}",
                status, body
            )));
        }

        let result: serde_json::Value = response
            .json()
            .await
            .map_err(|e| OcrError::ApiError(format!("Failed to parse response: {}", e)))?;

        let text = result["response"]
            .as_str()
            .unwrap_or("")
            .trim()
            .to_string();

        Ok(OcrResult {
            text,
            confidence: 75.0, // LLMs don't provide confidence scores
            provider: OcrProvider::Ollama,
        })
    }
}

/// Mock provider for testing
#[cfg(test)]
pub struct MockProvider {
    pub response: Result<OcrResult, String>,
    pub available: bool,
    calls: std::sync::atomic::AtomicUsize,
}

#[cfg(test)]
impl MockProvider {
    pub fn returning(text: &str) -> Self {
        Self {
            response: Ok(OcrResult {
                text: text.to_string(),
                confidence: 90.0,
                provider: OcrProvider::Tesseract,
            }),
            available: true,
            calls: Default::default(),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            response: Err(message.to_string()),
            available: true,
            calls: Default::default(),
        }
    }

    /// Number of `recognize` calls so far
    pub fn call_count(&self) -> usize {
        self.calls.load(std::sync::atomic::Ordering::SeqCst)
    }
}

#[cfg(test)]
#[async_trait]
impl OcrProviderTrait for MockProvider {
    fn provider_type(&self) -> OcrProvider {
        OcrProvider::Tesseract
    }

    async fn is_available(&self) -> bool {
        self.available
    }

    async fn recognize(&self, _image_data: &[u8], _language: &str) -> Result<OcrResult, OcrError> {
        self.calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        self.response
            .clone()
            .map_err(OcrError::ProcessingError)
    }
}

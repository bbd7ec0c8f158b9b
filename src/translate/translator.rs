//! Translation backends

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::config::TranslationConfig;

#[derive(Debug, Error)]
pub enum TranslateError {
    #[error("Translation request failed: {0}")]
    Request(String),

    #[error("Translation service returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Unexpected translation response: {0}")]
    InvalidResponse(String),
}

/// Text translation trait
#[async_trait]
pub trait Translator: Send + Sync {
    /// Backend name, for logs
    fn name(&self) -> &str;

    /// Translate `text` from `source` to `target` (ISO 639-1 codes)
    async fn translate(&self, text: &str, source: &str, target: &str)
        -> Result<String, TranslateError>;
}

/// Google Translate web endpoint
///
/// Requests are limited in size, so long text is split on line boundaries
/// into chunks of at most `chunk_chars` characters and translated in order.
pub struct GoogleTranslator {
    client: reqwest::Client,
    endpoint: String,
    chunk_chars: usize,
}

impl GoogleTranslator {
    pub fn new(config: &TranslationConfig) -> Result<Self, TranslateError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| TranslateError::Request(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            chunk_chars: config.chunk_chars.max(100),
        })
    }

    async fn translate_chunk(
        &self,
        chunk: &str,
        source: &str,
        target: &str,
    ) -> Result<String, TranslateError> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("client", "gtx"),
                ("sl", source),
                ("tl", target),
                ("dt", "t"),
                ("q", chunk),
            ])
            .send()
            .await
            .map_err(|e| TranslateError::Request(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(TranslateError::Status { status, body });
        }

        let value: serde_json::Value = response
            .json()
            .await
            .map_err(|e| TranslateError::InvalidResponse(e.to_string()))?;

        parse_google_response(&value)
    }
}

#[async_trait]
impl Translator for GoogleTranslator {
    fn name(&self) -> &str {
        "google"
    }

    async fn translate(
        &self,
        text: &str,
        source: &str,
        target: &str,
    ) -> Result<String, TranslateError> {
        let chunks = split_into_chunks(text, self.chunk_chars);
        let mut translated = Vec::with_capacity(chunks.len());

        for chunk in &chunks {
            translated.push(self.translate_chunk(chunk, source, target).await?);
        }

        tracing::debug!(
            chunks = chunks.len(),
            source,
            target,
            "Translated text"
        );

        Ok(translated.join("\n"))
    }
}

/// Concatenate the translated segments of a `translate_a/single` response
///
/// The payload is `[[["translated", "original", ...], ...], ...]`.
fn parse_google_response(value: &serde_json::Value) -> Result<String, TranslateError> {
    let segments = value
        .get(0)
        .and_then(|v| v.as_array())
        .ok_or_else(|| TranslateError::InvalidResponse("missing segment list".to_string()))?;

    Ok(segments
        .iter()
        .filter_map(|segment| segment.get(0).and_then(|s| s.as_str()))
        .collect::<String>())
}

/// Split text into chunks of at most `max_chars` characters
///
/// Splits prefer line boundaries; a single line longer than the limit is
/// cut on character boundaries.
fn split_into_chunks(text: &str, max_chars: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for line in text.lines() {
        let line_len = line.chars().count();

        if line_len > max_chars {
            if !current.is_empty() {
                chunks.push(std::mem::take(&mut current));
                current_len = 0;
            }
            let chars: Vec<char> = line.chars().collect();
            for piece in chars.chunks(max_chars) {
                chunks.push(piece.iter().collect());
            }
            continue;
        }

        let needed = if current.is_empty() { line_len } else { line_len + 1 };
        if current_len + needed > max_chars {
            chunks.push(std::mem::take(&mut current));
            current_len = 0;
        }

        if !current.is_empty() {
            current.push('\n');
            current_len += 1;
        }
        current.push_str(line);
        current_len += line_len;
    }

    if !current.trim().is_empty() {
        chunks.push(current);
    }

    chunks.retain(|c| !c.trim().is_empty());
    chunks
}

/// Translator double that tags text instead of calling a service
#[cfg(test)]
pub struct MockTranslator {
    pub fail: bool,
}

#[cfg(test)]
#[async_trait]
impl Translator for MockTranslator {
    fn name(&self) -> &str {
        "mock"
    }

    async fn translate(
        &self,
        text: &str,
        source: &str,
        target: &str,
    ) -> Result<String, TranslateError> {
        if self.fail {
            return Err(TranslateError::Request("connection refused".to_string()));
        }
        Ok(format!("[{}->{}] {}", source, target, text))
    }
}

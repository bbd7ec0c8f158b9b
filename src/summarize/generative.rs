//! Generative summary models

use std::time::Duration;

use async_trait::async_trait;

use super::types::SummaryError;

/// An abstractive summarization model
#[async_trait]
pub trait SummaryModel: Send + Sync {
    /// Model name, reported by the health endpoint
    fn name(&self) -> &str;

    /// Summarize `text` in roughly `min_words..=max_words` words
    async fn summarize(
        &self,
        text: &str,
        max_words: usize,
        min_words: usize,
    ) -> Result<String, SummaryError>;
}

/// Summary model served by a local Ollama instance
pub struct OllamaSummaryModel {
    client: reqwest::Client,
    base_url: String,
    model: String,
}

#[derive(serde::Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<TagEntry>,
}

#[derive(serde::Deserialize)]
struct TagEntry {
    name: String,
}

impl OllamaSummaryModel {
    /// Connect to Ollama and verify that `model` has been pulled
    ///
    /// Fails when the server is unreachable or the model is missing, which
    /// sends the summarizer to its extractive fallback.
    pub async fn connect(base_url: &str, model: &str) -> Result<Self, SummaryError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .map_err(|e| SummaryError::ModelUnavailable(e.to_string()))?;
        let base_url = base_url.trim_end_matches('/').to_string();

        let tags: TagsResponse = client
            .get(format!("{}/api/tags", base_url))
            .timeout(Duration::from_secs(5))
            .send()
            .await
            .map_err(|e| SummaryError::ModelUnavailable(format!("Ollama unreachable: {}", e)))?
            .error_for_status()
            .map_err(|e| SummaryError::ModelUnavailable(e.to_string()))?
            .json()
            .await
            .map_err(|e| SummaryError::ModelUnavailable(format!("Invalid tags response: {}", e)))?;

        let installed = tags
            .models
            .iter()
            .any(|m| m.name == model || m.name.split(':').next() == Some(model));

        if !installed {
            return Err(SummaryError::ModelUnavailable(format!(
                "model '{}' is not installed",
                model
            )));
        }

        Ok(Self {
            client,
            base_url,
            model: model.to_string(),
        })
    }
}

#[async_trait]
impl SummaryModel for OllamaSummaryModel {
    fn name(&self) -> &str {
        &self.model
    }

    async fn summarize(
        &self,
        text: &str,
        max_words: usize,
        min_words: usize,
    ) -> Result<String, SummaryError> {
        let prompt = format!(
            "Summarize the following document in {} to {} words. \
             Return only the summary.\n\n{}",
            min_words, max_words, text
        );

        let request = serde_json::json!({
            "model": self.model,
            "prompt": prompt,
            "stream": false
        });

        let response = self
            .client
            .post(format!("{}/api/generate", self.base_url))
            .json(&request)
            .send()
            .await
            .map_err(|e| SummaryError::Request(format!("Failed to call Ollama: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(SummaryError::Request(format!(
                "Ollama returned {}: {}",
                status, body
            )));
        }

        let result: serde_json::Value = response
            .json()
            .await
            .map_err(|e| SummaryError::Request(format!("Failed to parse response: {}", e)))?;

        let summary = result["response"].as_str().unwrap_or("").trim().to_string();
        if summary.is_empty() {
            return Err(SummaryError::EmptySummary);
        }

        Ok(summary)
    }
}

/// Model double returning a canned summary or error
#[cfg(test)]
pub struct MockSummaryModel {
    pub response: Result<String, String>,
}

#[cfg(test)]
#[async_trait]
impl SummaryModel for MockSummaryModel {
    fn name(&self) -> &str {
        "mock"
    }

    async fn summarize(
        &self,
        text: &str,
        _max_words: usize,
        _min_words: usize,
    ) -> Result<String, SummaryError> {
        match &self.response {
            Ok(summary) => Ok(format!("{} ({} chars in)", summary, text.chars().count())),
            Err(message) => Err(SummaryError::Request(message.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_connect_to_unreachable_server_fails() {
        let result = OllamaSummaryModel::connect("http://127.0.0.1:9", "llama3.2").await;
        assert!(matches!(result, Err(SummaryError::ModelUnavailable(_))));
    }
}

//! Summarizer
//!
//! Owns the summarization strategy chosen at startup. The generative model
//! handle is created once by [`Summarizer::initialize`]; if that fails the
//! extractive fallback is used for the lifetime of the process.

use std::sync::Arc;

use serde::Serialize;

use super::extractive::{extractive_summary, key_points, split_sentences, truncate_chars};
use super::generative::{OllamaSummaryModel, SummaryModel};
use super::types::{SummaryResult, SummaryType};
use crate::config::SummaryConfig;

/// Active summarization strategy
#[derive(Clone)]
pub enum SummaryStrategy {
    Generative(Arc<dyn SummaryModel>),
    Extractive,
}

/// Strategy description for health reporting
#[derive(Debug, Clone, Serialize)]
pub struct StrategyInfo {
    pub strategy: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

pub struct Summarizer {
    strategy: SummaryStrategy,
    config: SummaryConfig,
}

impl Summarizer {
    /// Build the summarizer, probing the configured generative model
    pub async fn initialize(config: &SummaryConfig) -> Self {
        if !config.enabled {
            tracing::info!("Generative summaries disabled, using extractive summarizer");
            return Self::extractive(config.clone());
        }

        match OllamaSummaryModel::connect(&config.ollama_url, &config.model).await {
            Ok(model) => {
                tracing::info!(model = %config.model, "Generative summary model ready");
                Self::with_model(config.clone(), Arc::new(model))
            }
            Err(e) => {
                tracing::warn!(
                    model = %config.model,
                    "Summary model failed to initialize ({}), falling back to extractive summaries",
                    e
                );
                Self::extractive(config.clone())
            }
        }
    }

    pub fn with_model(config: SummaryConfig, model: Arc<dyn SummaryModel>) -> Self {
        Self {
            strategy: SummaryStrategy::Generative(model),
            config,
        }
    }

    pub fn extractive(config: SummaryConfig) -> Self {
        Self {
            strategy: SummaryStrategy::Extractive,
            config,
        }
    }

    pub fn strategy_info(&self) -> StrategyInfo {
        match &self.strategy {
            SummaryStrategy::Generative(model) => StrategyInfo {
                strategy: "generative",
                model: Some(model.name().to_string()),
            },
            SummaryStrategy::Extractive => StrategyInfo {
                strategy: "extractive",
                model: None,
            },
        }
    }

    /// Minimum text length (characters) worth summarizing
    pub fn min_text_chars(&self) -> usize {
        self.config.min_text_chars
    }

    /// Default summary length bound
    pub fn default_max_length(&self) -> usize {
        self.config.max_length
    }

    /// Whether `text` is long enough to summarize
    pub fn is_summarizable(&self, text: &str) -> bool {
        text.trim().chars().count() >= self.config.min_text_chars
    }

    /// Summarize `text`; never fails, errors are reported in the result
    pub async fn summarize(&self, text: &str, max_length: usize) -> SummaryResult {
        if !self.is_summarizable(text) {
            return SummaryResult::insufficient_content();
        }

        let text = text.trim();
        let sentences = split_sentences(text);
        let points = key_points(
            &sentences,
            self.config.max_key_points,
            self.config.key_point_min_chars,
        );
        let original_length = text.chars().count();

        let (summary, summary_type) = match &self.strategy {
            SummaryStrategy::Generative(model) => {
                let input = truncate_chars(text, self.config.max_input_chars);
                let min_length = self.config.min_length.min(max_length);

                match model.summarize(&input, max_length, min_length).await {
                    Ok(summary) => (summary, SummaryType::AiGenerated),
                    Err(e) => {
                        tracing::error!(model = model.name(), "Summarization failed: {}", e);
                        return SummaryResult::failed(e.to_string());
                    }
                }
            }
            SummaryStrategy::Extractive => (
                extractive_summary(text, &sentences, max_length),
                SummaryType::Extractive,
            ),
        };

        SummaryResult {
            summary_length: Some(summary.chars().count()),
            summary,
            key_points: points,
            summary_type,
            original_length: Some(original_length),
            error: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::summarize::generative::MockSummaryModel;

    const NOTICE: &str = "Kochi Metro will run additional trains during the festival week. \
        Services will start at five in the morning and continue until midnight. \
        Passengers are advised to use the QR ticketing counters to avoid queues. \
        Parking at Aluva and Vyttila stations will be expanded temporarily. \
        Security checks will be tightened at all interchange stations.";

    fn config() -> SummaryConfig {
        Config::default().summary
    }

    #[tokio::test]
    async fn test_short_text_is_insufficient_for_every_strategy() {
        let short = "Too short to summarize.";
        let extractive = Summarizer::extractive(config());
        let generative = Summarizer::with_model(
            config(),
            Arc::new(MockSummaryModel {
                response: Ok("never called".into()),
            }),
        );

        for summarizer in [extractive, generative] {
            let result = summarizer.summarize(short, 150).await;
            assert_eq!(result.summary_type, SummaryType::InsufficientContent);
            assert!(result.key_points.is_empty());
        }
    }

    #[tokio::test]
    async fn test_extractive_summary() {
        let summarizer = Summarizer::extractive(config());
        let result = summarizer.summarize(NOTICE, 150).await;

        assert_eq!(result.summary_type, SummaryType::Extractive);
        assert!(result.summary.starts_with("Kochi Metro will run additional trains"));
        assert!(result.summary.contains("QR ticketing counters"));
        assert_eq!(result.key_points.len(), 5);
        assert_eq!(result.original_length, Some(NOTICE.chars().count()));
        assert_eq!(result.summary_length, Some(result.summary.chars().count()));
        assert!(result.error.is_none());
    }

    #[tokio::test]
    async fn test_generative_summary_truncates_input() {
        let mut cfg = config();
        cfg.max_input_chars = 100;
        let summarizer = Summarizer::with_model(
            cfg,
            Arc::new(MockSummaryModel {
                response: Ok("Festival week service changes".into()),
            }),
        );

        let result = summarizer.summarize(NOTICE, 150).await;

        assert_eq!(result.summary_type, SummaryType::AiGenerated);
        assert_eq!(result.summary, "Festival week service changes (100 chars in)");
        assert_eq!(result.key_points.len(), 5);
    }

    #[tokio::test]
    async fn test_generative_failure_is_reported_in_band() {
        let summarizer = Summarizer::with_model(
            config(),
            Arc::new(MockSummaryModel {
                response: Err("out of memory".into()),
            }),
        );

        let result = summarizer.summarize(NOTICE, 150).await;

        assert_eq!(result.summary_type, SummaryType::Error);
        assert!(result.summary.contains("out of memory"));
        assert!(result.error.is_some());
    }

    #[tokio::test]
    async fn test_disabled_config_uses_extractive() {
        let mut cfg = config();
        cfg.enabled = false;
        let summarizer = Summarizer::initialize(&cfg).await;
        assert_eq!(summarizer.strategy_info().strategy, "extractive");
    }
}

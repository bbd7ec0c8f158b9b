//! Document summarization
//!
//! Produces a short summary and key points for translated text, either with
//! a generative model or with the deterministic extractive fallback.

mod extractive;
mod generative;
mod service;
mod types;

pub use extractive::{extractive_summary, key_points, split_sentences, truncate_chars};
pub use generative::{OllamaSummaryModel, SummaryModel};
pub use service::{StrategyInfo, Summarizer, SummaryStrategy};
pub use types::{SummaryError, SummaryResult, SummaryType};

//! On-demand summarization
//!
//! - POST /api/summarize/:id?max_length=N - Summarize a completed job

use axum::{
    extract::{Path, Query, State},
    routing::post,
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::jobs::{parse_id, JobStatus};
use crate::state::AppState;
use crate::summarize::SummaryType;

#[derive(Debug, Default, Deserialize)]
pub struct SummarizeQuery {
    pub max_length: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct SummarizeResponse {
    pub id: Uuid,
    pub summary: String,
    pub key_points: Vec<String>,
    pub summary_type: SummaryType,
    pub original_length: Option<usize>,
    pub summary_length: Option<usize>,
    pub summary_generated_at: Option<DateTime<Utc>>,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/summarize/:id", post(summarize_document))
}

/// Regenerate the summary of a completed job and store it on the record
async fn summarize_document(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<SummarizeQuery>,
) -> Result<Json<SummarizeResponse>> {
    let id = parse_id(&id)?;
    let record = state
        .jobs()
        .get(id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Job {} not found", id)))?;

    if record.status != JobStatus::Completed {
        return Err(AppError::BadRequest(
            "Document processing not completed yet".to_string(),
        ));
    }

    let summarizer = state.summarizer();
    let text = record.translated_text.unwrap_or_default();
    if !summarizer.is_summarizable(&text) {
        return Err(AppError::BadRequest(format!(
            "Insufficient text for summarization (minimum {} characters)",
            summarizer.min_text_chars()
        )));
    }

    let max_length = query
        .max_length
        .filter(|n| *n > 0)
        .unwrap_or_else(|| summarizer.default_max_length());

    tracing::info!(job_id = %id, max_length, "Generating summary on request");
    let summary = summarizer.summarize(&text, max_length).await;

    let updated = state
        .jobs()
        .update(id, |record| record.apply_summary(&summary))
        .await?;

    Ok(Json(SummarizeResponse {
        id,
        summary: summary.summary,
        key_points: summary.key_points,
        summary_type: summary.summary_type,
        original_length: summary.original_length,
        summary_length: summary.summary_length,
        summary_generated_at: updated.summary_generated_at,
    }))
}

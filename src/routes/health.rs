//! Health check endpoints

use axum::{extract::State, routing::get, Json, Router};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::ocr::OcrProvider;
use crate::state::AppState;
use crate::summarize::StrategyInfo;

#[derive(Serialize)]
pub struct BannerResponse {
    pub message: &'static str,
    pub version: &'static str,
    pub status: &'static str,
    pub features: [&'static str; 4],
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
    pub tesseract_ready: bool,
    pub malayalam_ocr_enabled: bool,
    pub ocr_providers: Vec<OcrProvider>,
    pub summary_strategy: StrategyInfo,
    pub upload_dir: String,
    pub active_tasks: usize,
    pub total_processed: usize,
}

pub async fn banner() -> Json<BannerResponse> {
    Json(BannerResponse {
        message: "KMRL Train Induction Planning API",
        version: env!("CARGO_PKG_VERSION"),
        status: "active",
        features: [
            "Malayalam OCR",
            "Auto Translation",
            "Document Processing",
            "Summarization",
        ],
    })
}

pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let providers = state.ocr().available_providers().await;
    let tesseract_ready = providers.contains(&OcrProvider::Tesseract);
    let stats = state.jobs().stats().await;

    Json(HealthResponse {
        status: "healthy",
        timestamp: Utc::now(),
        tesseract_ready,
        malayalam_ocr_enabled: !providers.is_empty() && state.ocr().language().contains("mal"),
        ocr_providers: providers,
        summary_strategy: state.summarizer().strategy_info(),
        upload_dir: state.config().storage.upload_dir.display().to_string(),
        active_tasks: stats.processing,
        total_processed: stats.total,
    })
}

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}

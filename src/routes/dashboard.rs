//! Processing statistics

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::jobs::JobRecord;
use crate::state::AppState;

const RECENT_RESULTS: usize = 5;

#[derive(Serialize)]
pub struct DashboardResponse {
    pub total_documents: usize,
    pub completed: usize,
    pub processing: usize,
    pub errors: usize,
    pub malayalam_documents: usize,
    pub success_rate: f64,
    pub recent_results: Vec<JobRecord>,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/dashboard", get(dashboard))
}

async fn dashboard(State(state): State<AppState>) -> Json<DashboardResponse> {
    let stats = state.jobs().stats().await;
    let recent_results = state.jobs().recent(RECENT_RESULTS).await;

    Json(DashboardResponse {
        total_documents: stats.total,
        completed: stats.completed,
        processing: stats.processing,
        errors: stats.errors,
        malayalam_documents: stats.malayalam,
        success_rate: stats.success_rate(),
        recent_results,
    })
}

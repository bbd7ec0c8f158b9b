//! Job status and result endpoints
//!
//! - GET /api/status/:id - Current record for one job
//! - GET /api/results - All records in creation order
//! - DELETE /api/results/:id - Forget a job

use axum::{
    extract::{Path, State},
    routing::{delete, get},
    Json, Router,
};
use serde::Serialize;

use crate::error::Result;
use crate::jobs::{parse_id, JobRecord};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub message: &'static str,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/status/:id", get(get_status))
        .route("/results", get(list_results))
        .route("/results/:id", delete(delete_result))
}

async fn get_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<JobRecord>> {
    let record = state.jobs().get_by_str(&id).await?;
    Ok(Json(record))
}

async fn list_results(State(state): State<AppState>) -> Json<Vec<JobRecord>> {
    Json(state.jobs().list().await)
}

/// The uploaded file is left on disk
async fn delete_result(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>> {
    let id = parse_id(&id)?;
    state.jobs().remove(id).await?;

    Ok(Json(DeleteResponse {
        message: "Result deleted successfully",
    }))
}

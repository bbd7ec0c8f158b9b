//! Upload endpoint
//!
//! - POST /api/upload - Store a document and queue it for processing

use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use serde::Serialize;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::extract::{extension_of, SUPPORTED_EXTENSIONS};
use crate::jobs::{JobRecord, JobStatus, JobTask};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub id: Uuid,
    pub filename: String,
    pub status: JobStatus,
    pub message: String,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/upload", post(upload_document))
}

/// Accept a multipart `file` field, save it and start processing
async fn upload_document(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>> {
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some("file") {
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        let extension = extension_of(&filename);

        if !SUPPORTED_EXTENSIONS.contains(&extension.as_str()) {
            tracing::warn!(filename = %filename, "Rejected upload with unsupported extension");
            return Err(AppError::UnsupportedFileType(extension));
        }

        let data = field.bytes().await.map_err(multipart_error)?;

        let id = Uuid::new_v4();
        let upload_dir = &state.config().storage.upload_dir;
        let path = upload_dir.join(format!("{}{}", id, extension));

        tokio::fs::create_dir_all(upload_dir).await?;
        tokio::fs::write(&path, &data).await?;

        tracing::info!(
            job_id = %id,
            filename = %filename,
            bytes = data.len(),
            "File uploaded"
        );

        let progress = state.config().jobs.progress.uploaded;
        state
            .jobs()
            .insert(JobRecord::new(
                id,
                filename.clone(),
                progress,
                "File uploaded, starting OCR processing...",
            ))
            .await;

        let task = JobTask {
            id,
            path,
            filename: filename.clone(),
        };
        if let Err(e) = state.queue().submit(task) {
            state
                .jobs()
                .update(id, |record| {
                    record.fail(e.to_string(), format!("Processing failed: {}", e))
                })
                .await?;
            return Err(e.into());
        }

        return Ok(Json(UploadResponse {
            id,
            filename,
            status: JobStatus::Processing,
            message: "File uploaded successfully. Malayalam OCR processing started.".to_string(),
        }));
    }

    Err(AppError::BadRequest("No file provided".to_string()))
}

/// Body limit violations become 413, other multipart failures 400
fn multipart_error(err: MultipartError) -> AppError {
    tracing::warn!("Failed to read multipart upload: {}", err);
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(err.body_text())
    } else {
        AppError::BadRequest(format!("Failed to read upload: {}", err.body_text()))
    }
}

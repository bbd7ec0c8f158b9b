//! Route modules for the KMRL OCR server

pub mod dashboard;
pub mod health;
pub mod jobs;
pub mod summarize;
pub mod upload;

use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    routing::get,
    Router,
};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the application router with CORS, tracing and the upload limit
pub fn build_router(state: AppState) -> Router {
    let origins: Vec<HeaderValue> = state
        .config()
        .server
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers(Any);

    let body_limit = state.config().storage.max_upload_bytes;

    Router::new()
        .route("/", get(health::banner))
        .nest("/api", api_router())
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

fn api_router() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(upload::router())
        .merge(jobs::router())
        .merge(summarize::router())
        .merge(dashboard::router())
}

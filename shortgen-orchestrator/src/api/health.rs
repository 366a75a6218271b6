//! Health Check API Handler

use axum::{http::StatusCode, response::IntoResponse};

/// GET /health
/// Liveness probe; does not touch the queue or the engines
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

//! Health check endpoint

use axum::{http::StatusCode, response::IntoResponse};

/// Health check handler
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

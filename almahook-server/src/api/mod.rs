//! API Module
//!
//! Thin HTTP layer over the webhook service. Alma calls a single URL, so
//! the router stays small; method semantics (including the 405 for
//! unsupported methods) belong to the service.

pub mod health;
pub mod webhook;

use std::sync::Arc;

use axum::{
    Router,
    routing::{any, get},
};
use tower_http::trace::TraceLayer;

use crate::service::WebhookService;

/// Create the main API router
pub fn create_router(service: Arc<WebhookService>) -> Router {
    Router::new()
        // Webhook entry point; every method lands in the service
        .route("/", any(webhook::receive))
        // Health check
        .route("/health", get(health::health_check))
        // Add state and middleware
        .with_state(service)
        .layer(TraceLayer::new_for_http())
}

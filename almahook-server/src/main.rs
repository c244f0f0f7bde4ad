//! Almahook Server
//!
//! Receives job-end webhooks from Ex Libris Alma and starts the matching
//! export pipeline on the workflow orchestrator.
//!
//! Architecture:
//! - Configuration: challenge secret, environment and pipeline registry from env vars
//! - API: single webhook URL plus a health check, served by axum
//! - Service: signature verification, request classification, job matching, dispatch
//!
//! Every invocation is independent. The server keeps no state between
//! requests; whether a pipeline starts is decided entirely from the
//! request body and the startup configuration.

pub mod api;
pub mod config;
pub mod service;

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use almahook_client::WorkflowClient;
use almahook_core::matcher::JobMatcher;

use crate::config::Config;
use crate::service::{Dispatcher, WebhookService};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "almahook_server=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Almahook Server");

    // Load configuration; there are no usable defaults for a webhook
    // receiver, so any problem here is fatal.
    let config = Config::from_env()?;
    config.validate()?;

    info!(
        "Loaded configuration: environment={}, pipelines={}, orchestrator_url={}",
        config.environment,
        config.pipelines.len(),
        config.orchestrator_url
    );
    for pipeline in &config.pipelines {
        info!("  - {} <- {:?}", pipeline.kind, pipeline.pattern);
    }
    if config.pipelines.is_empty() {
        warn!("No pipelines configured; every JOB_END webhook will be acknowledged without action");
    }

    // Initialize orchestrator client with the dispatch timeout
    let http = reqwest::Client::builder()
        .timeout(config.dispatch_timeout)
        .build()
        .context("Failed to build HTTP client")?;
    let client = Arc::new(WorkflowClient::with_client(
        config.orchestrator_url.clone(),
        http,
    ));

    info!("Workflow client initialized");

    // Overlapping job-name patterns are a deployment mistake; refuse to serve
    let matcher = JobMatcher::new(config.environment, config.pipelines.clone())
        .context("Pipeline configuration is not usable")?;
    let dispatcher = Dispatcher::new(client);
    let webhook_service = Arc::new(WebhookService::new(
        config.challenge_secret.clone(),
        matcher,
        dispatcher,
    ));

    // Build router with all API endpoints
    let app = api::create_router(webhook_service);

    info!("Listening on {}", config.bind_addr);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", config.bind_addr))?;

    axum::serve(listener, app)
        .await
        .context("Failed to start server")?;

    Ok(())
}

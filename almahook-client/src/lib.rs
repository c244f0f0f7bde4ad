//! Workflow Orchestrator HTTP Client
//!
//! A small, type-safe client for the workflow orchestrator the webhook
//! receiver dispatches to. The orchestrator is treated as opaque: start a
//! workflow run, get a run identifier back, nothing else.
//!
//! # Example
//!
//! ```no_run
//! use almahook_client::WorkflowClient;
//!
//! #[tokio::main]
//! async fn main() -> almahook_client::Result<()> {
//!     let client = WorkflowClient::new("http://localhost:8080");
//!
//!     let run = client
//!         .start_workflow("timdex-ingest", &serde_json::json!({"source": "alma"}))
//!         .await?;
//!
//!     println!("started run: {}", run.run_id);
//!     Ok(())
//! }
//! ```

pub mod error;
mod workflows;

// Re-export commonly used types
pub use error::{ClientError, Result};
pub use workflows::{WorkflowLauncher, WorkflowRun};

use reqwest::Client;
use serde::de::DeserializeOwned;

/// HTTP client for the workflow orchestrator API
#[derive(Debug, Clone)]
pub struct WorkflowClient {
    /// Base URL of the orchestrator (e.g., "http://localhost:8080")
    base_url: String,
    /// HTTP client instance
    client: Client,
}

impl WorkflowClient {
    /// Create a new orchestrator client
    ///
    /// # Arguments
    /// * `base_url` - The base URL of the orchestrator API
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }

    /// Create a new orchestrator client with a custom HTTP client
    ///
    /// This is how the receiver bounds dispatch with a request timeout.
    ///
    /// # Arguments
    /// * `base_url` - The base URL of the orchestrator API
    /// * `client` - A configured reqwest Client
    ///
    /// # Example
    /// ```
    /// use almahook_client::WorkflowClient;
    /// use reqwest::Client;
    /// use std::time::Duration;
    ///
    /// let http_client = Client::builder()
    ///     .timeout(Duration::from_secs(30))
    ///     .build()
    ///     .unwrap();
    ///
    /// let client = WorkflowClient::with_client("http://localhost:8080", http_client);
    /// ```
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    /// Get the base URL of the orchestrator
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn http(&self) -> &Client {
        &self.client
    }

    /// Handle an API response and deserialize JSON
    ///
    /// Checks the status code and returns an appropriate error if the
    /// request failed, or deserializes the response body if successful.
    pub(crate) async fn handle_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T> {
        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClientError::api_error(status.as_u16(), error_text));
        }

        response
            .json()
            .await
            .map_err(|e| ClientError::ParseError(format!("Failed to parse JSON response: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = WorkflowClient::new("http://localhost:8080");
        assert_eq!(client.base_url(), "http://localhost:8080");
    }

    #[test]
    fn test_client_trims_trailing_slash() {
        let client = WorkflowClient::new("http://localhost:8080/");
        assert_eq!(client.base_url(), "http://localhost:8080");
    }

    #[test]
    fn test_client_with_custom_client() {
        let http_client = Client::new();
        let client = WorkflowClient::with_client("http://localhost:8080", http_client);
        assert_eq!(client.base_url(), "http://localhost:8080");
    }
}

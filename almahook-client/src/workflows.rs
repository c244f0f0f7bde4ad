//! Workflow-start endpoint

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::WorkflowClient;
use crate::error::Result;

/// A run accepted by the orchestrator.
///
/// The run identifier is opaque to this system; the orchestrator is the
/// system of record for run state and deduplication.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowRun {
    pub run_id: String,
}

/// Interface the webhook service dispatches through.
///
/// `WorkflowClient` implements this against the real orchestrator; tests
/// inject fakes to observe dispatch behavior without a live service.
#[async_trait]
pub trait WorkflowLauncher: Send + Sync {
    /// Start a run of `workflow_id` with the given input payload.
    async fn start_workflow(&self, workflow_id: &str, input: &Value) -> Result<WorkflowRun>;
}

impl WorkflowClient {
    /// Start a workflow run
    ///
    /// The call blocks only until the orchestrator accepts the run, never
    /// until the run completes.
    ///
    /// # Arguments
    /// * `workflow_id` - The configured workflow identifier
    /// * `input` - JSON input handed to the workflow as-is
    ///
    /// # Returns
    /// The accepted run's identifier
    ///
    /// # Example
    /// ```no_run
    /// # use almahook_client::WorkflowClient;
    /// # async fn example() -> almahook_client::Result<()> {
    /// let client = WorkflowClient::new("http://localhost:8080");
    /// let run = client
    ///     .start_workflow("ppod-upload", &serde_json::json!({"filename-prefix": "exlibris/pod/POD_ALMA_EXPORT_20220501"}))
    ///     .await?;
    /// println!("started run {}", run.run_id);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn start_workflow(&self, workflow_id: &str, input: &Value) -> Result<WorkflowRun> {
        let url = format!("{}/workflows/{}/runs", self.base_url(), workflow_id);
        tracing::debug!("Starting workflow run: POST {}", url);
        let response = self.http().post(&url).json(input).send().await?;

        self.handle_response(response).await
    }
}

#[async_trait]
impl WorkflowLauncher for WorkflowClient {
    async fn start_workflow(&self, workflow_id: &str, input: &Value) -> Result<WorkflowRun> {
        WorkflowClient::start_workflow(self, workflow_id, input).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workflow_run_deserializes() {
        let run: WorkflowRun = serde_json::from_str(r#"{"run_id": "run-20220501-0001"}"#).unwrap();
        assert_eq!(run.run_id, "run-20220501-0001");
    }
}

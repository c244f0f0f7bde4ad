//! Workflow dispatch
//!
//! Builds the pipeline-specific workflow input and starts exactly one run
//! per matched event. No retry here: a failed dispatch surfaces as an
//! error response and Alma's own redelivery takes it from there.

use std::sync::Arc;

use serde_json::{Value, json};
use tracing::info;

use almahook_client::{ClientError, WorkflowLauncher, WorkflowRun};
use almahook_core::event::JobEndEvent;
use almahook_core::pipeline::{PipelineDescriptor, PipelineKind};

/// Location prefix of POD export bundles on the shared drop point.
const POD_EXPORT_PREFIX: &str = "exlibris/pod/POD_ALMA_EXPORT_";

/// Starts workflow runs for matched job-end events.
#[derive(Clone)]
pub struct Dispatcher {
    launcher: Arc<dyn WorkflowLauncher>,
}

impl Dispatcher {
    pub fn new(launcher: Arc<dyn WorkflowLauncher>) -> Self {
        Self { launcher }
    }

    /// Start the matched pipeline's workflow for this event.
    ///
    /// Blocks only until the orchestrator accepts the run, bounded by the
    /// HTTP client's timeout.
    pub async fn dispatch(
        &self,
        descriptor: &PipelineDescriptor,
        event: &JobEndEvent,
    ) -> Result<WorkflowRun, ClientError> {
        let input = build_workflow_input(descriptor.kind, event);

        info!(
            "Starting {} workflow {} for job '{}'",
            descriptor.kind, descriptor.workflow_id, event.job_name
        );

        let run = self
            .launcher
            .start_workflow(&descriptor.workflow_id, &input)
            .await?;

        info!(
            "{} workflow run {} accepted by orchestrator",
            descriptor.kind, run.run_id
        );

        Ok(run)
    }
}

/// Input payload each downstream workflow expects.
pub fn build_workflow_input(kind: PipelineKind, event: &JobEndEvent) -> Value {
    match kind {
        PipelineKind::Ppod => {
            let date = event.export_date().format("%Y%m%d").to_string();
            json!({
                "filename-prefix": format!("{}{}", POD_EXPORT_PREFIX, date),
            })
        }
        PipelineKind::Timdex => json!({
            "next-step": "transform",
            "run-date": event.export_date().format("%Y-%m-%d").to_string(),
            "run-type": timdex_run_type(&event.job_name),
            "source": "alma",
            "verbose": "true",
        }),
        PipelineKind::Bursar => json!({
            "job_id": event.job_id.clone().unwrap_or_default(),
            "job_name": event.job_name,
        }),
    }
}

/// Full exports rebuild the index from scratch; everything else runs as a
/// daily increment. Alma encodes the distinction in the job name.
fn timdex_run_type(job_name: &str) -> &'static str {
    if job_name.contains("FULL") { "full" } else { "daily" }
}

#[cfg(test)]
mod tests {
    use super::*;
    use almahook_core::event::JobStatus;

    fn event(job_name: &str, end_time: Option<&str>) -> JobEndEvent {
        JobEndEvent {
            job_name: job_name.to_string(),
            job_id: Some("12345".to_string()),
            end_time: end_time.map(String::from),
            status: Some(JobStatus::CompletedSuccess),
            counters: vec![],
        }
    }

    #[test]
    fn test_ppod_input_shape() {
        let event = event("PPOD Export", Some("2022-05-01T14:55:14.894Z"));
        let input = build_workflow_input(PipelineKind::Ppod, &event);
        assert_eq!(
            input,
            json!({"filename-prefix": "exlibris/pod/POD_ALMA_EXPORT_20220501"})
        );
    }

    #[test]
    fn test_timdex_input_shape_full_run() {
        let event = event("TIMDEX Export to Test FULL", Some("2022-05-01T14:55:14.894Z"));
        let input = build_workflow_input(PipelineKind::Timdex, &event);
        assert_eq!(
            input,
            json!({
                "next-step": "transform",
                "run-date": "2022-05-01",
                "run-type": "full",
                "source": "alma",
                "verbose": "true",
            })
        );
    }

    #[test]
    fn test_timdex_input_shape_daily_run() {
        let event = event("TIMDEX Export to Test DAILY", Some("2023-08-15"));
        let input = build_workflow_input(PipelineKind::Timdex, &event);
        assert_eq!(input["run-type"], "daily");
        assert_eq!(input["run-date"], "2023-08-15");
    }

    #[test]
    fn test_bursar_input_passes_job_through() {
        let event = event("Bursar Export to test", None);
        let input = build_workflow_input(PipelineKind::Bursar, &event);
        assert_eq!(
            input,
            json!({"job_id": "12345", "job_name": "Bursar Export to test"})
        );
    }

    #[test]
    fn test_bursar_input_with_missing_job_id() {
        let mut event = event("Bursar Export to test", None);
        event.job_id = None;
        let input = build_workflow_input(PipelineKind::Bursar, &event);
        assert_eq!(input["job_id"], "");
    }
}

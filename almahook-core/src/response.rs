//! Fixed-shape webhook responses
//!
//! Every code path maps to one of a small set of plain-text responses.
//! Alma surfaces these bodies to operators, so the texts are stable and
//! never carry secrets, stack traces or run identifiers.

use crate::pipeline::PipelineKind;

/// Content type of every webhook response.
pub const RESPONSE_CONTENT_TYPE: &str = "text/plain";

/// Status code and body for one webhook invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookResponse {
    pub status: u16,
    pub body: String,
}

impl WebhookResponse {
    fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Challenge handshake echo; the body is the supplied value verbatim.
    pub fn challenge_echo(value: &str) -> Self {
        Self::new(200, value)
    }

    pub fn missing_challenge() -> Self {
        Self::new(
            400,
            "Malformed request, 'challenge' query parameter required.",
        )
    }

    pub fn method_not_allowed(method: &str) -> Self {
        Self::new(
            405,
            format!(
                "HTTP method {} not allowed. Supported methods: GET, POST.",
                method
            ),
        )
    }

    pub fn invalid_signature() -> Self {
        Self::new(
            401,
            "Unable to validate signature. Has the webhook challenge secret changed?",
        )
    }

    pub fn not_job_end() -> Self {
        Self::new(
            200,
            "Webhook POST request received and validated, not a JOB_END webhook so no action was taken.",
        )
    }

    pub fn no_action_taken() -> Self {
        Self::new(
            200,
            "Webhook POST request received and validated, no action taken.",
        )
    }

    pub fn job_not_successful(pipeline: PipelineKind) -> Self {
        Self::new(
            200,
            format!(
                "Webhook POST request received and validated, {} export job failed so no action was taken.",
                pipeline
            ),
        )
    }

    pub fn pipeline_initiated(pipeline: PipelineKind) -> Self {
        Self::new(
            200,
            format!(
                "Webhook POST request received and validated, {} pipeline initiated.",
                pipeline
            ),
        )
    }

    pub fn malformed_body() -> Self {
        Self::new(400, "Malformed webhook request body.")
    }

    pub fn configuration_error() -> Self {
        Self::new(
            500,
            "Webhook request could not be processed due to a configuration error.",
        )
    }

    pub fn dispatch_failed(pipeline: PipelineKind) -> Self {
        Self::new(
            502,
            format!(
                "Webhook POST request received and validated, but the {} pipeline could not be started.",
                pipeline
            ),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_challenge_echo_returns_value_verbatim() {
        let response = WebhookResponse::challenge_echo("challenge-accepted");
        assert_eq!(response.status, 200);
        assert_eq!(response.body, "challenge-accepted");
    }

    #[test]
    fn test_method_not_allowed_names_method() {
        let response = WebhookResponse::method_not_allowed("DELETE");
        assert_eq!(response.status, 405);
        assert_eq!(
            response.body,
            "HTTP method DELETE not allowed. Supported methods: GET, POST."
        );
    }

    #[test]
    fn test_invalid_signature_is_unauthorized() {
        let response = WebhookResponse::invalid_signature();
        assert_eq!(response.status, 401);
        assert_eq!(
            response.body,
            "Unable to validate signature. Has the webhook challenge secret changed?"
        );
    }

    #[test]
    fn test_pipeline_initiated_names_pipeline() {
        let response = WebhookResponse::pipeline_initiated(PipelineKind::Ppod);
        assert_eq!(response.status, 200);
        assert_eq!(
            response.body,
            "Webhook POST request received and validated, PPOD pipeline initiated."
        );
    }

    #[test]
    fn test_job_not_successful_names_pipeline() {
        let response = WebhookResponse::job_not_successful(PipelineKind::Timdex);
        assert_eq!(response.status, 200);
        assert_eq!(
            response.body,
            "Webhook POST request received and validated, TIMDEX export job failed so no action was taken."
        );
    }

    #[test]
    fn test_error_responses_use_error_codes() {
        assert_eq!(WebhookResponse::missing_challenge().status, 400);
        assert_eq!(WebhookResponse::malformed_body().status, 400);
        assert_eq!(WebhookResponse::configuration_error().status, 500);
        assert_eq!(
            WebhookResponse::dispatch_failed(PipelineKind::Bursar).status,
            502
        );
    }
}

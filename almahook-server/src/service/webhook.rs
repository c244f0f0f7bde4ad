//! Webhook decision flow
//!
//! One entry point per invocation: verify, classify, match, dispatch,
//! respond. Every path ends in a fixed-shape response; nothing here panics
//! or leaks an error to the HTTP layer.

use tracing::{error, info, warn};

use almahook_core::event::JobEndEvent;
use almahook_core::matcher::{JobMatcher, MatchOutcome};
use almahook_core::request::{ClassifiedRequest, InboundRequest, classify};
use almahook_core::response::WebhookResponse;
use almahook_core::signature::{SIGNATURE_HEADER, verify_signature};

use crate::service::dispatch::Dispatcher;

/// Request-handling service for the Alma webhook endpoint.
pub struct WebhookService {
    challenge_secret: String,
    matcher: JobMatcher,
    dispatcher: Dispatcher,
}

impl WebhookService {
    pub fn new(challenge_secret: String, matcher: JobMatcher, dispatcher: Dispatcher) -> Self {
        Self {
            challenge_secret,
            matcher,
            dispatcher,
        }
    }

    /// Handle one invocation end to end.
    pub async fn handle(&self, request: &InboundRequest) -> WebhookResponse {
        // The signature covers the raw body bytes. Nothing in a POST is
        // parsed until it verifies.
        if request.method() == "POST" && !self.signature_is_valid(request) {
            warn!("Invalid signature in POST request, returning 401 error response.");
            return WebhookResponse::invalid_signature();
        }

        match classify(request) {
            ClassifiedRequest::Challenge(value) => {
                info!("GET request received, returning 200 success response.");
                WebhookResponse::challenge_echo(&value)
            }
            ClassifiedRequest::MissingChallenge => {
                warn!(
                    "Received GET request without 'challenge' query parameter, returning 400 error response."
                );
                WebhookResponse::missing_challenge()
            }
            ClassifiedRequest::JobEnd(event) => self.handle_job_end(&event).await,
            ClassifiedRequest::Other { action } => {
                warn!(
                    "Received a non-JOB_END webhook POST request (action '{}'), may require investigation. Returning 200 success response.",
                    action
                );
                WebhookResponse::not_job_end()
            }
            ClassifiedRequest::Malformed { reason } => {
                warn!(
                    "Received a malformed webhook POST request ({}), returning 400 error response.",
                    reason
                );
                WebhookResponse::malformed_body()
            }
            ClassifiedRequest::MethodNotAllowed { method } => {
                warn!(
                    "Received invalid HTTP request method {}, returning 405 error response.",
                    method
                );
                WebhookResponse::method_not_allowed(&method)
            }
        }
    }

    fn signature_is_valid(&self, request: &InboundRequest) -> bool {
        let Some(supplied) = request.header(SIGNATURE_HEADER) else {
            return false;
        };
        verify_signature(&self.challenge_secret, request.body(), supplied)
    }

    async fn handle_job_end(&self, event: &JobEndEvent) -> WebhookResponse {
        let outcome = match self.matcher.match_job(event) {
            Ok(outcome) => outcome,
            Err(err) => {
                error!(
                    "Pipeline configuration fault while matching job '{}': {}",
                    event.job_name, err
                );
                return WebhookResponse::configuration_error();
            }
        };

        match outcome {
            MatchOutcome::Unmatched => {
                info!(
                    "POST request received and validated, no action triggered. Returning 200 success response."
                );
                WebhookResponse::no_action_taken()
            }
            MatchOutcome::JobNotSuccessful { pipeline } => {
                warn!(
                    "{} export job did not complete successfully, may need investigation. Returning 200 success response.",
                    pipeline
                );
                WebhookResponse::job_not_successful(pipeline)
            }
            MatchOutcome::Matched(descriptor) => {
                info!(
                    "{} export from Alma completed successfully with {} exported records, initiating {} workflow.",
                    descriptor.kind,
                    event.exported_record_count(),
                    descriptor.kind
                );
                match self.dispatcher.dispatch(&descriptor, event).await {
                    Ok(run) => {
                        info!(
                            "{} workflow run {} started, returning 200 success response.",
                            descriptor.kind, run.run_id
                        );
                        WebhookResponse::pipeline_initiated(descriptor.kind)
                    }
                    Err(err) => {
                        error!(
                            "{} workflow could not be started, returning 502 error response: {}",
                            descriptor.kind, err
                        );
                        WebhookResponse::dispatch_failed(descriptor.kind)
                    }
                }
            }
        }
    }
}

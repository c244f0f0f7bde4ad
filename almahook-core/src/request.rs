//! Inbound request model and classification
//!
//! Classification is a pure function of method, query parameters and body
//! shape. Signature verification is the caller's job and must happen
//! before a POST classification is trusted.

use std::collections::HashMap;

use bytes::Bytes;
use serde::Deserialize;

use crate::event::{JobEndEvent, JobInstanceWire};

/// Action value of a job completion notification.
pub const JOB_END_ACTION: &str = "JOB_END";

/// A webhook invocation, reduced to what the service needs.
///
/// Header names are lowercased at construction. The body is kept as the
/// raw bytes the caller signed.
#[derive(Debug, Clone)]
pub struct InboundRequest {
    method: String,
    headers: HashMap<String, String>,
    query: HashMap<String, String>,
    body: Bytes,
}

impl InboundRequest {
    pub fn new(
        method: impl Into<String>,
        headers: HashMap<String, String>,
        query: HashMap<String, String>,
        body: Bytes,
    ) -> Self {
        let headers = headers
            .into_iter()
            .map(|(name, value)| (name.to_lowercase(), value))
            .collect();
        Self {
            method: method.into().to_uppercase(),
            headers,
            query,
            body,
        }
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_lowercase()).map(String::as_str)
    }

    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query.get(name).map(String::as_str)
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }
}

/// Everything a webhook call can turn out to be.
#[derive(Debug, Clone)]
pub enum ClassifiedRequest {
    /// Subscription-verification handshake; the value is echoed back.
    Challenge(String),
    /// GET without the `challenge` query parameter.
    MissingChallenge,
    /// A job completion notification with a usable `job_instance`.
    JobEnd(JobEndEvent),
    /// A POST for some other action; acknowledged, never acted on.
    Other { action: String },
    /// A POST body Alma should never send.
    Malformed { reason: String },
    /// Anything but GET or POST.
    MethodNotAllowed { method: String },
}

/// Classifies one invocation.
pub fn classify(request: &InboundRequest) -> ClassifiedRequest {
    match request.method() {
        "GET" => classify_get(request),
        "POST" => classify_post(request),
        other => ClassifiedRequest::MethodNotAllowed {
            method: other.to_string(),
        },
    }
}

fn classify_get(request: &InboundRequest) -> ClassifiedRequest {
    match request.query_param("challenge") {
        Some(value) => ClassifiedRequest::Challenge(value.to_string()),
        None => ClassifiedRequest::MissingChallenge,
    }
}

/// Probe decoded before the full event, so an unknown action never fails
/// on the shape of fields we would not read anyway.
#[derive(Debug, Deserialize)]
struct ActionProbe {
    action: String,
}

#[derive(Debug, Deserialize)]
struct JobEndWire {
    job_instance: JobInstanceWire,
}

fn classify_post(request: &InboundRequest) -> ClassifiedRequest {
    let probe: ActionProbe = match serde_json::from_slice(request.body()) {
        Ok(probe) => probe,
        Err(err) => {
            return ClassifiedRequest::Malformed {
                reason: format!("body is not a webhook event: {}", err),
            };
        }
    };

    if probe.action != JOB_END_ACTION {
        return ClassifiedRequest::Other {
            action: probe.action,
        };
    }

    let wire: JobEndWire = match serde_json::from_slice(request.body()) {
        Ok(wire) => wire,
        Err(err) => {
            return ClassifiedRequest::Malformed {
                reason: format!("JOB_END event has no usable job_instance: {}", err),
            };
        }
    };

    match JobEndEvent::try_from(wire.job_instance) {
        Ok(event) => ClassifiedRequest::JobEnd(event),
        Err(reason) => ClassifiedRequest::Malformed { reason },
    }
}

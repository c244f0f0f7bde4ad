//! Webhook endpoint
//!
//! Translates between axum's extractors and the transport-neutral
//! [`InboundRequest`] the service consumes. The body is taken as raw
//! bytes because the signature is computed over the bytes exactly as
//! Alma sent them.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{HeaderMap, Method, StatusCode, header},
    response::{IntoResponse, Response},
};

use almahook_core::request::InboundRequest;
use almahook_core::response::RESPONSE_CONTENT_TYPE;

use crate::service::WebhookService;

/// Handler for every request hitting the webhook URL, regardless of method
pub async fn receive(
    State(service): State<Arc<WebhookService>>,
    method: Method,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let headers: HashMap<String, String> = headers
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|v| (name.as_str().to_string(), v.to_string()))
        })
        .collect();

    let request = InboundRequest::new(method.as_str(), headers, query, body);
    let outcome = service.handle(&request).await;

    let status =
        StatusCode::from_u16(outcome.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (
        status,
        [(header::CONTENT_TYPE, RESPONSE_CONTENT_TYPE)],
        outcome.body,
    )
        .into_response()
}

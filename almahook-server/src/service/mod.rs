//! Service layer
//!
//! Business logic for the receiver: the per-invocation webhook decision
//! flow and workflow dispatch. The HTTP layer stays a thin adapter over
//! these services.

pub mod dispatch;
pub mod webhook;

pub use dispatch::Dispatcher;
pub use webhook::WebhookService;

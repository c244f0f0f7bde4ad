//! Almahook Core
//!
//! Domain types and decision logic for the Alma webhook receiver.
//!
//! This crate contains:
//! - Signature verification over raw request bodies
//! - Request classification and the job-end event model
//! - Environment-scoped pipeline matching
//! - Fixed-shape response building
//!
//! Everything here is pure computation; HTTP hosting and the outbound
//! orchestrator call live in the server crate.

pub mod environment;
pub mod event;
pub mod matcher;
pub mod pipeline;
pub mod request;
pub mod response;
pub mod signature;

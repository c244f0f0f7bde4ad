//! Configuration module
//!
//! Handles CLI configuration including the webhook receiver URL.

/// CLI configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// URL of the webhook receiver
    pub webhook_url: String,
}

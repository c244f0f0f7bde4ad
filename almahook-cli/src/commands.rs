//! Commands module
//!
//! Defines all CLI commands and their handlers.

use anyhow::{Context, Result, bail};
use chrono::Utc;
use clap::Subcommand;
use colored::*;
use serde_json::json;

use almahook_core::request::JOB_END_ACTION;
use almahook_core::signature::{SIGNATURE_HEADER, compute_signature};

use crate::config::Config;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Send a challenge request and check that it is echoed back
    Challenge {
        /// Challenge string to send
        #[arg(long, default_value = "ping")]
        challenge: String,
    },
    /// Send a signed JOB_END webhook for a job name
    JobEnd {
        /// Job name as it appears in Alma
        job_name: String,

        /// Job instance id
        #[arg(long)]
        job_id: Option<String>,

        /// Report the job as failed instead of successful
        #[arg(long)]
        failed: bool,

        /// Challenge secret used to sign the body
        #[arg(long, env = "ALMA_CHALLENGE_SECRET", hide_env_values = true)]
        secret: String,
    },
    /// Compute the signature for a request body
    Sign {
        /// Request body to sign
        body: String,

        /// Challenge secret used to sign the body
        #[arg(long, env = "ALMA_CHALLENGE_SECRET", hide_env_values = true)]
        secret: String,
    },
}

/// Handle a CLI command
///
/// Routes the command to the appropriate handler.
///
/// # Arguments
/// * `command` - The command to execute
/// * `config` - The CLI configuration
///
/// # Returns
/// Result indicating success or failure
pub async fn handle_command(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Challenge { challenge } => send_challenge(config, &challenge).await,
        Commands::JobEnd {
            job_name,
            job_id,
            failed,
            secret,
        } => send_job_end(config, &secret, &job_name, job_id, failed).await,
        Commands::Sign { body, secret } => {
            println!("{}", compute_signature(&secret, body.as_bytes()));
            Ok(())
        }
    }
}

/// Send a challenge request and verify the echo
async fn send_challenge(config: &Config, challenge: &str) -> Result<()> {
    let client = reqwest::Client::new();
    let response = client
        .get(&config.webhook_url)
        .query(&[("challenge", challenge)])
        .send()
        .await
        .context("Failed to reach webhook receiver")?;

    let status = response.status();
    let body = response
        .text()
        .await
        .context("Failed to read response body")?;

    if status.is_success() && body == challenge {
        println!("{}", "✓ Challenge echoed back!".green().bold());
    } else {
        println!("{}", format!("✗ Unexpected response ({})", status).red());
        println!("{}", body);
        bail!("challenge was not echoed back");
    }

    Ok(())
}

/// Build a JOB_END body, sign it and POST it to the receiver
async fn send_job_end(
    config: &Config,
    secret: &str,
    job_name: &str,
    job_id: Option<String>,
    failed: bool,
) -> Result<()> {
    let job_status = if failed {
        "COMPLETED_FAILED"
    } else {
        "COMPLETED_SUCCESS"
    };
    let body = json!({
        "action": JOB_END_ACTION,
        "job_instance": {
            "id": job_id,
            "name": job_name,
            "end_time": Utc::now().to_rfc3339(),
            "status": { "value": job_status },
            "counter": [],
        },
    })
    .to_string();

    let signature = compute_signature(secret, body.as_bytes());

    let client = reqwest::Client::new();
    let response = client
        .post(&config.webhook_url)
        .header(SIGNATURE_HEADER, signature)
        .body(body)
        .send()
        .await
        .context("Failed to reach webhook receiver")?;

    let status = response.status();
    let text = response
        .text()
        .await
        .context("Failed to read response body")?;

    if status.is_success() {
        println!(
            "{}",
            format!("✓ Webhook accepted ({})", status).green().bold()
        );
    } else {
        println!("{}", format!("✗ Webhook rejected ({})", status).red());
    }
    println!("{}", text);

    if !status.is_success() {
        bail!("webhook receiver returned {}", status);
    }

    Ok(())
}

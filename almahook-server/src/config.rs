//! Receiver configuration
//!
//! All deployment-specific values come from the environment and are read
//! once at startup. A pipeline is configured by providing both its job
//! name (or prefix) and its workflow id; providing only one of the pair is
//! a startup error, since a half-configured pipeline would silently drop
//! the very notifications it was deployed to catch.

use std::time::Duration;

use anyhow::Context;

use almahook_core::environment::RuntimeEnvironment;
use almahook_core::pipeline::{JobNamePattern, PipelineDescriptor, PipelineKind};

/// Receiver configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Secret shared with Alma for request signing. Never logged.
    pub challenge_secret: String,

    /// Deployment environment; scopes job-name matching
    pub environment: RuntimeEnvironment,

    /// Workflow orchestrator base URL (e.g., "http://localhost:8080")
    pub orchestrator_url: String,

    /// Configured pipelines; may be empty
    pub pipelines: Vec<PipelineDescriptor>,

    /// Bind address for the HTTP server
    pub bind_addr: String,

    /// Upper bound on one workflow-start call
    pub dispatch_timeout: Duration,
}

impl Config {
    /// Creates configuration from environment variables
    ///
    /// Expected environment variables:
    /// - ALMA_CHALLENGE_SECRET (required)
    /// - WORKSPACE (required; dev, stage or prod)
    /// - ORCHESTRATOR_URL (required)
    /// - ALMA_PPOD_EXPORT_JOB_NAME + PPOD_WORKFLOW_ID (optional pair)
    /// - ALMA_TIMDEX_EXPORT_JOB_NAME_PREFIX + TIMDEX_WORKFLOW_ID (optional pair)
    /// - ALMA_BURSAR_EXPORT_JOB_NAME + BURSAR_WORKFLOW_ID (optional pair)
    /// - WEBHOOK_BIND_ADDR (optional, default: 0.0.0.0:8080)
    /// - DISPATCH_TIMEOUT_SECS (optional, seconds, default: 30)
    pub fn from_env() -> anyhow::Result<Self> {
        let challenge_secret = require_env("ALMA_CHALLENGE_SECRET")?;

        let environment = require_env("WORKSPACE")?
            .parse::<RuntimeEnvironment>()
            .context("WORKSPACE environment variable is not a known environment")?;

        let orchestrator_url = require_env("ORCHESTRATOR_URL")?;

        let pipelines = [
            env_pipeline(
                PipelineKind::Ppod,
                "ALMA_PPOD_EXPORT_JOB_NAME",
                "PPOD_WORKFLOW_ID",
                PatternStyle::Exact,
                false,
            )?,
            env_pipeline(
                PipelineKind::Timdex,
                "ALMA_TIMDEX_EXPORT_JOB_NAME_PREFIX",
                "TIMDEX_WORKFLOW_ID",
                PatternStyle::Prefix,
                true,
            )?,
            env_pipeline(
                PipelineKind::Bursar,
                "ALMA_BURSAR_EXPORT_JOB_NAME",
                "BURSAR_WORKFLOW_ID",
                PatternStyle::Exact,
                false,
            )?,
        ]
        .into_iter()
        .flatten()
        .collect();

        let bind_addr =
            optional_env("WEBHOOK_BIND_ADDR").unwrap_or_else(|| "0.0.0.0:8080".to_string());

        let dispatch_timeout = match optional_env("DISPATCH_TIMEOUT_SECS") {
            Some(raw) => Duration::from_secs(
                raw.parse::<u64>()
                    .context("DISPATCH_TIMEOUT_SECS must be a number of seconds")?,
            ),
            None => Duration::from_secs(30),
        };

        Ok(Self {
            challenge_secret,
            environment,
            orchestrator_url,
            pipelines,
            bind_addr,
            dispatch_timeout,
        })
    }

    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.challenge_secret.is_empty() {
            anyhow::bail!("challenge secret cannot be empty");
        }

        if self.orchestrator_url.is_empty() {
            anyhow::bail!("orchestrator_url cannot be empty");
        }

        if !self.orchestrator_url.starts_with("http://")
            && !self.orchestrator_url.starts_with("https://")
        {
            anyhow::bail!("orchestrator_url must start with http:// or https://");
        }

        if self.bind_addr.is_empty() {
            anyhow::bail!("bind_addr cannot be empty");
        }

        if self.dispatch_timeout.as_secs() == 0 {
            anyhow::bail!("dispatch timeout must be greater than 0");
        }

        Ok(())
    }
}

/// How a configured job name value is turned into a pattern.
#[derive(Debug, Clone, Copy)]
enum PatternStyle {
    Exact,
    Prefix,
}

fn env_pipeline(
    kind: PipelineKind,
    name_var: &'static str,
    workflow_var: &'static str,
    style: PatternStyle,
    env_scoped: bool,
) -> anyhow::Result<Option<PipelineDescriptor>> {
    pipeline_pair(
        kind,
        name_var,
        workflow_var,
        optional_env(name_var),
        optional_env(workflow_var),
        style,
        env_scoped,
    )
}

/// Builds one pipeline descriptor from its configuration pair.
///
/// Both values present: a descriptor. Both absent: the pipeline is simply
/// not deployed here. One of the two: a startup error.
fn pipeline_pair(
    kind: PipelineKind,
    name_var: &str,
    workflow_var: &str,
    name: Option<String>,
    workflow_id: Option<String>,
    style: PatternStyle,
    env_scoped: bool,
) -> anyhow::Result<Option<PipelineDescriptor>> {
    match (name, workflow_id) {
        (Some(name), Some(workflow_id)) => {
            if name.is_empty() {
                anyhow::bail!("{} must not be empty", name_var);
            }
            if workflow_id.is_empty() {
                anyhow::bail!("{} must not be empty", workflow_var);
            }
            let pattern = match style {
                PatternStyle::Exact => JobNamePattern::Exact(name),
                PatternStyle::Prefix => JobNamePattern::Prefix(name),
            };
            Ok(Some(PipelineDescriptor {
                kind,
                pattern,
                workflow_id,
                env_scoped,
            }))
        }
        (None, None) => Ok(None),
        (Some(_), None) => anyhow::bail!(
            "{} pipeline is partially configured: {} is set but {} is not",
            kind,
            name_var,
            workflow_var
        ),
        (None, Some(_)) => anyhow::bail!(
            "{} pipeline is partially configured: {} is set but {} is not",
            kind,
            workflow_var,
            name_var
        ),
    }
}

fn require_env(name: &str) -> anyhow::Result<String> {
    std::env::var(name).map_err(|_| anyhow::anyhow!("{} environment variable not set", name))
}

fn optional_env(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

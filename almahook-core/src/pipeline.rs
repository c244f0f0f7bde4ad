//! Pipeline configuration model
//!
//! One descriptor per downstream pipeline, loaded at startup and never
//! mutated afterwards.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The downstream pipelines this receiver can start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PipelineKind {
    /// POD metadata export upload.
    Ppod,
    /// TIMDEX index ingest.
    Timdex,
    /// Bursar billing export transfer.
    Bursar,
}

impl PipelineKind {
    /// Label used in response bodies and log lines.
    pub fn label(&self) -> &'static str {
        match self {
            PipelineKind::Ppod => "PPOD",
            PipelineKind::Timdex => "TIMDEX",
            PipelineKind::Bursar => "Bursar",
        }
    }
}

impl fmt::Display for PipelineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// How a configured job name is compared against an event's job name.
///
/// Comparison is case- and whitespace-sensitive exactly as configured.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobNamePattern {
    /// Byte-for-byte equality.
    Exact(String),
    /// The job name must start with the configured prefix. Used for job
    /// families whose names carry per-environment or per-run suffixes.
    Prefix(String),
}

impl JobNamePattern {
    pub fn matches(&self, job_name: &str) -> bool {
        match self {
            JobNamePattern::Exact(name) => job_name == name,
            JobNamePattern::Prefix(prefix) => job_name.starts_with(prefix.as_str()),
        }
    }

    /// Whether any job name could satisfy both patterns.
    pub fn overlaps(&self, other: &JobNamePattern) -> bool {
        match (self, other) {
            (JobNamePattern::Exact(a), JobNamePattern::Exact(b)) => a == b,
            (JobNamePattern::Exact(name), JobNamePattern::Prefix(prefix))
            | (JobNamePattern::Prefix(prefix), JobNamePattern::Exact(name)) => {
                name.starts_with(prefix.as_str())
            }
            (JobNamePattern::Prefix(a), JobNamePattern::Prefix(b)) => {
                a.starts_with(b.as_str()) || b.starts_with(a.as_str())
            }
        }
    }

    /// The configured name or prefix text.
    pub fn as_str(&self) -> &str {
        match self {
            JobNamePattern::Exact(name) => name,
            JobNamePattern::Prefix(prefix) => prefix,
        }
    }
}

/// One configured job-name-to-workflow mapping.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineDescriptor {
    pub kind: PipelineKind,
    pub pattern: JobNamePattern,
    /// Workflow the orchestrator starts when this pipeline matches.
    pub workflow_id: String,
    /// Whether the job name must also carry the runtime environment token.
    pub env_scoped: bool,
}

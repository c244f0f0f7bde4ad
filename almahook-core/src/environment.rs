//! Runtime environment scoping
//!
//! Alma notifies both the stage and prod copies of this receiver for jobs
//! configured against either environment. Environment-scoped job names must
//! carry the deployment's token before any action is taken, so a stage job
//! can never start a prod pipeline.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Deployment environment of the running receiver.
///
/// Parsed once at startup from the `WORKSPACE` value and fixed for the
/// process lifetime. Passed explicitly wherever scoping decisions are made.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeEnvironment {
    Development,
    Stage,
    Prod,
}

impl RuntimeEnvironment {
    /// Token an environment-scoped job name must contain in this
    /// environment. Development has no mirrored traffic and requires none.
    pub fn job_name_token(&self) -> Option<&'static str> {
        match self {
            RuntimeEnvironment::Development => None,
            RuntimeEnvironment::Stage => Some("stage"),
            RuntimeEnvironment::Prod => Some("prod"),
        }
    }

    /// Whether `job_name` is in scope for this environment.
    ///
    /// Token containment is case-insensitive since Alma operators mix
    /// cases freely in job names.
    pub fn accepts_job_name(&self, job_name: &str) -> bool {
        match self.job_name_token() {
            None => true,
            Some(token) => job_name.to_lowercase().contains(token),
        }
    }
}

impl fmt::Display for RuntimeEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuntimeEnvironment::Development => write!(f, "dev"),
            RuntimeEnvironment::Stage => write!(f, "stage"),
            RuntimeEnvironment::Prod => write!(f, "prod"),
        }
    }
}

/// Returned when a workspace value names no known environment.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown runtime environment {0:?}, expected dev, stage or prod")]
pub struct ParseEnvironmentError(String);

impl FromStr for RuntimeEnvironment {
    type Err = ParseEnvironmentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "dev" | "development" => Ok(RuntimeEnvironment::Development),
            "stage" | "staging" => Ok(RuntimeEnvironment::Stage),
            "prod" | "production" => Ok(RuntimeEnvironment::Prod),
            _ => Err(ParseEnvironmentError(s.to_string())),
        }
    }
}

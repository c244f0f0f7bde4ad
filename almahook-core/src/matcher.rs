//! Environment-scoped job matching
//!
//! The matcher decides, per job-end event, whether this deployment should
//! start a pipeline. Most notifications are unrelated jobs and the answer
//! is no. The dangerous case is a job configured against the other
//! environment: the name matches textually but must never dispatch here.

use thiserror::Error;

use crate::environment::RuntimeEnvironment;
use crate::event::JobEndEvent;
use crate::pipeline::{PipelineDescriptor, PipelineKind};

/// Configuration faults the matcher refuses to route around.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatchError {
    /// Two descriptors could both claim some job name. Rejected when the
    /// matcher is built so the deployment fails at startup.
    #[error("pipelines {first} and {second} have overlapping job name patterns")]
    OverlappingPatterns {
        first: PipelineKind,
        second: PipelineKind,
    },

    /// More than one descriptor claimed this event's job name. Never
    /// resolved by precedence; dispatching on a guess could start the
    /// wrong pipeline or the same pipeline twice.
    #[error("job name {job_name:?} matches more than one configured pipeline")]
    AmbiguousMatch { job_name: String },
}

/// Decision for one job-end event.
#[derive(Debug, Clone)]
pub enum MatchOutcome {
    /// Start this pipeline.
    Matched(PipelineDescriptor),
    /// The name matched a pipeline but the job did not complete
    /// successfully. Acknowledged and logged, never dispatched.
    JobNotSuccessful { pipeline: PipelineKind },
    /// Not a job this deployment acts on. The common case.
    Unmatched,
}

/// Matches job-end events against the configured pipelines, scoped to the
/// deployment's runtime environment.
#[derive(Debug, Clone)]
pub struct JobMatcher {
    environment: RuntimeEnvironment,
    descriptors: Vec<PipelineDescriptor>,
}

impl JobMatcher {
    /// Builds a matcher over an immutable descriptor set.
    ///
    /// Fails if any two patterns overlap, so misconfiguration surfaces at
    /// startup instead of on the first ambiguous delivery.
    pub fn new(
        environment: RuntimeEnvironment,
        descriptors: Vec<PipelineDescriptor>,
    ) -> Result<Self, MatchError> {
        for (index, first) in descriptors.iter().enumerate() {
            for second in &descriptors[index + 1..] {
                if first.pattern.overlaps(&second.pattern) {
                    return Err(MatchError::OverlappingPatterns {
                        first: first.kind,
                        second: second.kind,
                    });
                }
            }
        }
        Ok(Self {
            environment,
            descriptors,
        })
    }

    pub fn environment(&self) -> RuntimeEnvironment {
        self.environment
    }

    pub fn descriptors(&self) -> &[PipelineDescriptor] {
        &self.descriptors
    }

    /// Decides what to do with a job-end event.
    ///
    /// A descriptor is a candidate when its pattern matches the job name
    /// and, for env-scoped descriptors, the name carries the current
    /// environment's token. Multiple candidates are a configuration fault
    /// and surface as an error rather than a pick.
    pub fn match_job(&self, event: &JobEndEvent) -> Result<MatchOutcome, MatchError> {
        let candidates: Vec<&PipelineDescriptor> = self
            .descriptors
            .iter()
            .filter(|descriptor| self.is_candidate(descriptor, &event.job_name))
            .collect();

        match candidates.as_slice() {
            [] => Ok(MatchOutcome::Unmatched),
            [descriptor] => {
                if event.is_successful() {
                    Ok(MatchOutcome::Matched((*descriptor).clone()))
                } else {
                    Ok(MatchOutcome::JobNotSuccessful {
                        pipeline: descriptor.kind,
                    })
                }
            }
            _ => Err(MatchError::AmbiguousMatch {
                job_name: event.job_name.clone(),
            }),
        }
    }

    fn is_candidate(&self, descriptor: &PipelineDescriptor, job_name: &str) -> bool {
        if !descriptor.pattern.matches(job_name) {
            return false;
        }
        !descriptor.env_scoped || self.environment.accepts_job_name(job_name)
    }
}

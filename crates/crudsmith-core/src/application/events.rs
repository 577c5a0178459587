//! Pipeline progress events.
//!
//! Services report every step transition to a [`PipelineObserver`] so that
//! transports can render progress and tests can assert on ordering without
//! scraping logs.
//!
//! [`PipelineObserver`]: crate::application::ports::PipelineObserver

use std::fmt;
use std::path::PathBuf;

use crate::{application::ports::PipelineObserver, domain::ArtifactKind};

/// One stage of a generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PipelineStep {
    Validate,
    PrepareStaging,
    Write(ArtifactKind),
    Archive,
    Deliver,
    Cleanup,
}

impl fmt::Display for PipelineStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validate => f.write_str("validate"),
            Self::PrepareStaging => f.write_str("prepare-staging"),
            Self::Write(kind) => write!(f, "write:{kind}"),
            Self::Archive => f.write_str("archive"),
            Self::Deliver => f.write_str("deliver"),
            Self::Cleanup => f.write_str("cleanup"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PipelineEvent {
    /// Paths reserved for this request, reported before anything is created.
    StagingAllocated { root: PathBuf, archive: PathBuf },
    StepStarted(PipelineStep),
    StepSucceeded(PipelineStep),
    StepFailed { step: PipelineStep, reason: String },
    ArtifactWritten { kind: ArtifactKind, path: PathBuf },
    ArtifactSkipped {
        entity: String,
        kind: ArtifactKind,
        reason: String,
    },
}

impl PipelineEvent {
    pub fn failed(step: PipelineStep, reason: impl fmt::Display) -> Self {
        Self::StepFailed {
            step,
            reason: reason.to_string(),
        }
    }

    /// The step this event belongs to, if it is a step transition.
    pub fn step(&self) -> Option<PipelineStep> {
        match self {
            Self::StepStarted(step) | Self::StepSucceeded(step) => Some(*step),
            Self::StepFailed { step, .. } => Some(*step),
            _ => None,
        }
    }
}

/// Observer that drops every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl PipelineObserver for NoopObserver {
    fn on_event(&self, _event: &PipelineEvent) {}
}

/// Run `f` as `step`, reporting start and outcome.
pub(crate) fn observe_step<T, E: fmt::Display>(
    observer: &dyn PipelineObserver,
    step: PipelineStep,
    f: impl FnOnce() -> Result<T, E>,
) -> Result<T, E> {
    observer.on_event(&PipelineEvent::StepStarted(step));
    let result = f();
    match &result {
        Ok(_) => observer.on_event(&PipelineEvent::StepSucceeded(step)),
        Err(e) => observer.on_event(&PipelineEvent::failed(step, e)),
    }
    result
}

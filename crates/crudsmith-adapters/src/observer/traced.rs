//! Observer that forwards pipeline events to `tracing`.

use tracing::{debug, info, warn};

use crudsmith_core::application::{PipelineEvent, ports::PipelineObserver};

/// Logs every event; failures at `warn`, file writes at `debug`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl TracingObserver {
    pub fn new() -> Self {
        Self
    }
}

impl PipelineObserver for TracingObserver {
    fn on_event(&self, event: &PipelineEvent) {
        match event {
            PipelineEvent::StagingAllocated { root, .. } => {
                debug!(root = %root.display(), "Staging allocated")
            }
            PipelineEvent::StepStarted(step) => debug!(%step, "Step started"),
            PipelineEvent::StepSucceeded(step) => info!(%step, "Step completed"),
            PipelineEvent::StepFailed { step, reason } => warn!(%step, %reason, "Step failed"),
            PipelineEvent::ArtifactWritten { kind, path } => {
                debug!(%kind, path = %path.display(), "Artifact written")
            }
            PipelineEvent::ArtifactSkipped {
                entity,
                kind,
                reason,
            } => warn!(%entity, %kind, %reason, "Artifact skipped"),
        }
    }
}

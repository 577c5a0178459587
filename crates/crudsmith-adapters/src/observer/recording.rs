//! Observer that buffers events in memory.

use std::sync::{Arc, Mutex, MutexGuard};

use crudsmith_core::application::{PipelineEvent, PipelineStep, ports::PipelineObserver};

/// Thread-safe event buffer.
///
/// Clones share the same buffer, so one handle can be given to a service
/// while another is kept for inspection.
#[derive(Debug, Default, Clone)]
pub struct RecordingObserver {
    events: Arc<Mutex<Vec<PipelineEvent>>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<PipelineEvent>> {
        // A panicking observer call cannot leave the Vec half-written.
        self.events.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Snapshot of every event so far, in arrival order.
    pub fn events(&self) -> Vec<PipelineEvent> {
        self.lock().clone()
    }

    /// Steps that completed successfully, in order.
    pub fn steps(&self) -> Vec<PipelineStep> {
        self.lock()
            .iter()
            .filter_map(|e| match e {
                PipelineEvent::StepSucceeded(step) => Some(*step),
                _ => None,
            })
            .collect()
    }

    /// Steps that reported failure, in order.
    pub fn failures(&self) -> Vec<PipelineStep> {
        self.lock()
            .iter()
            .filter_map(|e| match e {
                PipelineEvent::StepFailed { step, .. } => Some(*step),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }
}

impl PipelineObserver for RecordingObserver {
    fn on_event(&self, event: &PipelineEvent) {
        self.lock().push(event.clone());
    }
}

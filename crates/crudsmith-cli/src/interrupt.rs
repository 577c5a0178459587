//! Cleanup of partial output when `generate` is interrupted.
//!
//! The core service removes its staging tree and transient archive on every
//! return path, but SIGINT/SIGTERM terminate the process before any `Drop`
//! runs. [`LeftoverTracker`] learns the paths a generation reserves from the
//! pipeline events, and [`arm`] installs a handler that removes them before
//! exiting with `128 + signal`.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{debug, warn};

use crudsmith_core::application::{PipelineEvent, PipelineObserver, PipelineStep};

use crate::error::CliResult;

#[derive(Debug, Default)]
struct Leftovers {
    staging_root: Option<PathBuf>,
    archive: Option<PathBuf>,
    output: Option<PathBuf>,
}

/// Paths that must not outlive an interrupted generation.
///
/// Clones share state: one handle feeds the observer, another goes to the
/// signal thread.
#[derive(Debug, Default, Clone)]
pub struct LeftoverTracker {
    inner: Arc<Mutex<Leftovers>>,
}

impl LeftoverTracker {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Leftovers> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Record the destination file the archive is being streamed into.
    pub fn track_output(&self, path: &Path) {
        self.lock().output = Some(path.to_path_buf());
    }

    /// Remove everything still tracked. Best effort; returns how many paths
    /// were actually removed.
    pub fn remove_all(&self) -> usize {
        let mut leftovers = self.lock();
        let mut removed = 0;

        if let Some(root) = leftovers.staging_root.take()
            && root.exists()
        {
            match std::fs::remove_dir_all(&root) {
                Ok(()) => removed += 1,
                Err(e) => warn!(error = %e, path = %root.display(), "Could not remove staging root"),
            }
        }
        for file in [leftovers.archive.take(), leftovers.output.take()]
            .into_iter()
            .flatten()
        {
            if !file.exists() {
                continue;
            }
            match std::fs::remove_file(&file) {
                Ok(()) => removed += 1,
                Err(e) => warn!(error = %e, path = %file.display(), "Could not remove partial file"),
            }
        }
        removed
    }

    fn observe(&self, event: &PipelineEvent) {
        match event {
            PipelineEvent::StagingAllocated { root, archive } => {
                let mut leftovers = self.lock();
                leftovers.staging_root = Some(root.clone());
                leftovers.archive = Some(archive.clone());
            }
            // The service has already tried to clean up; a later signal must
            // not touch a path another run may have reused.
            PipelineEvent::StepSucceeded(_) | PipelineEvent::StepFailed { .. }
                if event.step() == Some(PipelineStep::Cleanup) =>
            {
                let mut leftovers = self.lock();
                leftovers.staging_root = None;
                leftovers.archive = None;
            }
            _ => {}
        }
    }
}

/// Observer that feeds a [`LeftoverTracker`] and forwards every event.
pub struct TrackingObserver {
    tracker: LeftoverTracker,
    inner: Box<dyn PipelineObserver>,
}

impl TrackingObserver {
    pub fn new(tracker: LeftoverTracker, inner: Box<dyn PipelineObserver>) -> Self {
        Self { tracker, inner }
    }
}

impl PipelineObserver for TrackingObserver {
    fn on_event(&self, event: &PipelineEvent) {
        self.tracker.observe(event);
        self.inner.on_event(event);
    }
}

/// Keeps the signal handler installed. Dropping it restores the default
/// disposition once generation has returned.
#[cfg(unix)]
pub struct InterruptGuard {
    handle: signal_hook::iterator::Handle,
    thread: Option<std::thread::JoinHandle<()>>,
}

#[cfg(unix)]
impl Drop for InterruptGuard {
    fn drop(&mut self) {
        self.handle.close();
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

/// Install a SIGINT/SIGTERM handler that removes whatever `tracker` holds.
#[cfg(unix)]
pub fn arm(tracker: LeftoverTracker) -> CliResult<InterruptGuard> {
    use signal_hook::consts::{SIGINT, SIGTERM};
    use signal_hook::iterator::Signals;

    use crate::error::IntoCli;

    let mut signals = Signals::new([SIGINT, SIGTERM])
        .with_cli_context(|| "Failed to install interrupt handler")?;
    let handle = signals.handle();
    let thread = std::thread::Builder::new()
        .name("crudsmith-interrupt".into())
        .spawn(move || {
            if let Some(signal) = signals.forever().next() {
                let removed = tracker.remove_all();
                warn!(signal, removed, "Interrupted, partial output removed");
                std::process::exit(128 + signal);
            }
            debug!("Interrupt handler closed");
        })
        .with_cli_context(|| "Failed to start interrupt handler")?;

    Ok(InterruptGuard {
        handle,
        thread: Some(thread),
    })
}

#[cfg(not(unix))]
pub struct InterruptGuard;

#[cfg(not(unix))]
pub fn arm(_tracker: LeftoverTracker) -> CliResult<InterruptGuard> {
    debug!("Interrupt cleanup is only available on unix");
    Ok(InterruptGuard)
}

#[cfg(test)]
mod tests {
    use super::*;

    use crudsmith_adapters::RecordingObserver;

    struct Scene {
        _dir: tempfile::TempDir,
        root: PathBuf,
        archive: PathBuf,
        output: PathBuf,
    }

    fn scene() -> Scene {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("shop-1a2b");
        std::fs::create_dir_all(root.join("src/models")).unwrap();
        std::fs::write(root.join("package.json"), "{}").unwrap();
        let archive = dir.path().join("shop-1a2b.zip");
        std::fs::write(&archive, b"PK").unwrap();
        let output = dir.path().join("shop.zip");
        std::fs::write(&output, b"PK").unwrap();
        Scene {
            _dir: dir,
            root,
            archive,
            output,
        }
    }

    fn allocated(scene: &Scene) -> PipelineEvent {
        PipelineEvent::StagingAllocated {
            root: scene.root.clone(),
            archive: scene.archive.clone(),
        }
    }

    #[test]
    fn interrupted_generation_leaves_nothing_behind() {
        let scene = scene();
        let tracker = LeftoverTracker::new();
        let observer = TrackingObserver::new(tracker.clone(), Box::new(RecordingObserver::new()));

        observer.on_event(&allocated(&scene));
        observer.on_event(&PipelineEvent::StepStarted(PipelineStep::Archive));
        tracker.track_output(&scene.output);

        assert_eq!(tracker.remove_all(), 3);
        assert!(!scene.root.exists());
        assert!(!scene.archive.exists());
        assert!(!scene.output.exists());
    }

    #[test]
    fn interrupt_before_staging_only_removes_output() {
        let scene = scene();
        let tracker = LeftoverTracker::new();
        tracker.track_output(&scene.output);

        assert_eq!(tracker.remove_all(), 1);
        assert!(scene.root.exists());
        assert!(!scene.output.exists());
    }

    #[test]
    fn finished_cleanup_releases_staging_paths() {
        let scene = scene();
        let tracker = LeftoverTracker::new();
        let observer = TrackingObserver::new(tracker.clone(), Box::new(RecordingObserver::new()));

        observer.on_event(&allocated(&scene));
        observer.on_event(&PipelineEvent::StepStarted(PipelineStep::Cleanup));
        observer.on_event(&PipelineEvent::StepSucceeded(PipelineStep::Cleanup));

        assert_eq!(tracker.remove_all(), 0);
        assert!(scene.root.exists());
        assert!(scene.archive.exists());
    }

    #[test]
    fn started_cleanup_keeps_staging_paths() {
        let scene = scene();
        let tracker = LeftoverTracker::new();
        let observer = TrackingObserver::new(tracker.clone(), Box::new(RecordingObserver::new()));

        observer.on_event(&allocated(&scene));
        observer.on_event(&PipelineEvent::StepStarted(PipelineStep::Cleanup));

        assert_eq!(tracker.remove_all(), 2);
        assert!(!scene.root.exists());
    }

    #[test]
    fn events_are_forwarded() {
        let recorder = RecordingObserver::new();
        let observer = TrackingObserver::new(LeftoverTracker::new(), Box::new(recorder.clone()));

        observer.on_event(&PipelineEvent::StepSucceeded(PipelineStep::Validate));

        assert_eq!(recorder.steps(), vec![PipelineStep::Validate]);
    }

    #[test]
    fn remove_all_is_idempotent() {
        let scene = scene();
        let tracker = LeftoverTracker::new();
        tracker.track_output(&scene.output);

        assert_eq!(tracker.remove_all(), 1);
        assert_eq!(tracker.remove_all(), 0);
    }

    #[cfg(unix)]
    #[test]
    fn disarming_stops_the_handler_thread() {
        let guard = arm(LeftoverTracker::new()).unwrap();
        // Drop joins the thread; a handler that never closed would hang here.
        drop(guard);
    }
}

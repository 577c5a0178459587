//! Artifact Writer - persists one artifact kind of a rendered set.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::{
    application::{
        events::{PipelineEvent, PipelineStep, observe_step},
        ports::{Filesystem, PipelineObserver},
    },
    domain::{ArtifactKind, ArtifactSlot, ProjectArtifactSet, StagingDirectory},
    error::CrudsmithResult,
};

/// One per-entity artifact that was not written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedArtifact {
    pub entity: String,
    pub kind: ArtifactKind,
    pub reason: String,
}

/// What a write pass did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteReport {
    pub written: Vec<PathBuf>,
    pub skipped: Vec<SkippedArtifact>,
    pub bytes: usize,
}

impl WriteReport {
    pub fn merge(&mut self, other: WriteReport) {
        self.written.extend(other.written);
        self.skipped.extend(other.skipped);
        self.bytes += other.bytes;
    }

    pub fn files_written(&self) -> usize {
        self.written.len()
    }
}

pub struct ArtifactWriter<'a> {
    filesystem: &'a dyn Filesystem,
    observer: &'a dyn PipelineObserver,
}

impl<'a> ArtifactWriter<'a> {
    pub fn new(filesystem: &'a dyn Filesystem, observer: &'a dyn PipelineObserver) -> Self {
        Self {
            filesystem,
            observer,
        }
    }

    /// Write every artifact of `kind` from `set` under the staging root.
    ///
    /// Directories are created idempotently. Skipped slots are reported and
    /// passed over; the first I/O error aborts the pass.
    pub fn write(
        &self,
        set: &ProjectArtifactSet,
        staging: &StagingDirectory,
        kind: ArtifactKind,
    ) -> CrudsmithResult<WriteReport> {
        observe_step(self.observer, PipelineStep::Write(kind), || {
            self.write_kind(set, staging, kind)
        })
    }

    fn write_kind(
        &self,
        set: &ProjectArtifactSet,
        staging: &StagingDirectory,
        kind: ArtifactKind,
    ) -> CrudsmithResult<WriteReport> {
        let mut report = WriteReport::default();

        let dirs: BTreeSet<&Path> = set
            .of_kind(kind)
            .filter_map(|slot| match slot {
                ArtifactSlot::Rendered(a) => a.path.parent(),
                ArtifactSlot::Skipped { .. } => None,
            })
            .collect();
        for dir in dirs {
            self.filesystem.create_dir_all(&staging.resolve(dir))?;
        }

        for slot in set.of_kind(kind) {
            match slot {
                ArtifactSlot::Rendered(artifact) => {
                    let path = staging.resolve(&artifact.path);
                    self.filesystem.write_file(&path, &artifact.content)?;
                    if artifact.permissions.executable_flag() {
                        self.filesystem.set_permissions(&path, true)?;
                    }
                    debug!(path = %artifact.path, bytes = artifact.size(), "Wrote artifact");
                    self.observer.on_event(&PipelineEvent::ArtifactWritten {
                        kind,
                        path: artifact.path.as_path().to_path_buf(),
                    });
                    report.bytes += artifact.size();
                    report.written.push(path);
                }
                ArtifactSlot::Skipped {
                    entity,
                    kind,
                    reason,
                } => {
                    warn!(%entity, %kind, %reason, "Artifact skipped");
                    self.observer.on_event(&PipelineEvent::ArtifactSkipped {
                        entity: entity.clone(),
                        kind: *kind,
                        reason: reason.clone(),
                    });
                    report.skipped.push(SkippedArtifact {
                        entity: entity.clone(),
                        kind: *kind,
                        reason: reason.clone(),
                    });
                }
            }
        }

        Ok(report)
    }
}

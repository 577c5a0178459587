//! Project Assembler - materializes a rendered project on disk.
//!
//! 1. Validate the request (before any side effect)
//! 2. Render the artifact set
//! 3. Allocate and create the staging skeleton
//! 4. Write kinds in dependency order
//!
//! Any failure after the staging root exists rolls the tree back.

use std::path::PathBuf;

use tracing::{info, instrument, warn};

use crate::{
    application::{
        events::{PipelineEvent, PipelineStep, observe_step},
        ports::{Filesystem, PipelineObserver},
        services::{
            artifact_writer::{ArtifactWriter, WriteReport},
            template_engine::TemplateEngine,
        },
    },
    domain::{
        DomainValidator as validator, GenerationRequest, ProjectArtifactSet, StagingDirectory,
        StagingStrategy,
    },
    error::{CrudsmithError, CrudsmithResult},
};

/// Where and how staging directories are allocated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagingSettings {
    pub output_root: PathBuf,
    pub strategy: StagingStrategy,
}

impl Default for StagingSettings {
    fn default() -> Self {
        Self {
            output_root: std::env::temp_dir().join("crudsmith"),
            strategy: StagingStrategy::default(),
        }
    }
}

/// A fully written staging tree, ready for packaging.
#[derive(Debug, Clone)]
pub struct AssembledProject {
    pub staging: StagingDirectory,
    pub artifacts: ProjectArtifactSet,
    pub report: WriteReport,
}

pub struct ProjectAssembler<'a> {
    engine: &'a TemplateEngine,
    filesystem: &'a dyn Filesystem,
    observer: &'a dyn PipelineObserver,
    settings: &'a StagingSettings,
}

impl<'a> ProjectAssembler<'a> {
    pub fn new(
        engine: &'a TemplateEngine,
        filesystem: &'a dyn Filesystem,
        observer: &'a dyn PipelineObserver,
        settings: &'a StagingSettings,
    ) -> Self {
        Self {
            engine,
            filesystem,
            observer,
            settings,
        }
    }

    #[instrument(
        skip_all,
        fields(project = %request.project_name(), strategy = %self.settings.strategy)
    )]
    pub fn assemble(&self, request: &GenerationRequest) -> CrudsmithResult<AssembledProject> {
        observe_step(self.observer, PipelineStep::Validate, || {
            validator::validate_request(request).map_err(CrudsmithError::Domain)
        })?;

        let artifacts = self.engine.render_project(request);
        let staging = StagingDirectory::allocate(
            &self.settings.output_root,
            request.project_name(),
            self.settings.strategy,
        );
        self.observer.on_event(&PipelineEvent::StagingAllocated {
            root: staging.root().to_path_buf(),
            archive: staging.archive_path().to_path_buf(),
        });

        match self.write_tree(&artifacts, &staging) {
            Ok(report) => {
                info!(
                    root = %staging.root().display(),
                    files = report.files_written(),
                    skipped = report.skipped.len(),
                    "Project assembled"
                );
                Ok(AssembledProject {
                    staging,
                    artifacts,
                    report,
                })
            }
            Err(e) => {
                warn!("Assembly failed, attempting rollback");
                self.rollback(&staging);
                Err(e)
            }
        }
    }

    fn write_tree(
        &self,
        artifacts: &ProjectArtifactSet,
        staging: &StagingDirectory,
    ) -> CrudsmithResult<WriteReport> {
        observe_step(self.observer, PipelineStep::PrepareStaging, || {
            self.filesystem.create_dir_all(staging.root())?;
            self.filesystem.create_dir_all(&staging.resolve("src"))
        })?;

        let writer = ArtifactWriter::new(self.filesystem, self.observer);
        let mut report = WriteReport::default();
        for &kind in artifacts.dialect().artifact_kinds() {
            report.merge(writer.write(artifacts, staging, kind)?);
        }
        Ok(report)
    }

    /// Best-effort rollback on failure.
    fn rollback(&self, staging: &StagingDirectory) {
        let root = staging.root();
        if !self.filesystem.exists(root) {
            return;
        }
        if let Err(e) = self.filesystem.remove_dir_all(root) {
            warn!(
                error = %e,
                path = %root.display(),
                "Rollback failed"
            );
        } else {
            info!("Rollback successful");
        }
    }
}

//! Generation Service - main application orchestrator.
//!
//! This service coordinates one generation end to end:
//! 1. Assemble the project into a fresh staging directory
//! 2. Archive it and stream the archive to the caller
//! 3. Remove every staging artifact
//!
//! It implements the driving port (incoming) and uses driven ports (outgoing).
//! Each call is one sequential unit; nothing is shared between calls except
//! the immutable configuration, so one service can serve many threads.

use std::io::Write;

use tracing::{info, instrument};

use crate::{
    application::{
        events::NoopObserver,
        ports::{Archiver, Filesystem, PipelineObserver, TemplateRenderer},
        services::{
            artifact_writer::WriteReport,
            assembler::{ProjectAssembler, StagingSettings},
            packager::{PackageReceipt, Packager},
            template_engine::TemplateEngine,
        },
    },
    domain::{
        Dialect, DomainValidator as validator, GenerationRequest, ProjectArtifactSet,
        StartupScriptFlavor,
    },
    error::{CrudsmithError, CrudsmithResult},
};

/// Result of a successful generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationOutcome {
    pub dialect: Dialect,
    pub receipt: PackageReceipt,
    pub report: WriteReport,
}

/// Main generation service.
pub struct GenerationService {
    engine: TemplateEngine,
    filesystem: Box<dyn Filesystem>,
    archiver: Box<dyn Archiver>,
    observer: Box<dyn PipelineObserver>,
    staging: StagingSettings,
}

impl GenerationService {
    /// Create a new generation service with the given adapters.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use crudsmith_core::application::GenerationService;
    ///
    /// let service = GenerationService::new(
    ///     renderer,   // impl TemplateRenderer
    ///     filesystem, // impl Filesystem
    ///     archiver,   // impl Archiver
    /// );
    /// ```
    pub fn new(
        renderer: Box<dyn TemplateRenderer>,
        filesystem: Box<dyn Filesystem>,
        archiver: Box<dyn Archiver>,
    ) -> Self {
        Self {
            engine: TemplateEngine::new(renderer),
            filesystem,
            archiver,
            observer: Box::new(NoopObserver),
            staging: StagingSettings::default(),
        }
    }

    pub fn with_observer(mut self, observer: Box<dyn PipelineObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn with_staging(mut self, staging: StagingSettings) -> Self {
        self.staging = staging;
        self
    }

    pub fn with_startup_script(mut self, flavor: StartupScriptFlavor) -> Self {
        self.engine = self.engine.with_startup_script(flavor);
        self
    }

    pub fn dialect(&self) -> Dialect {
        self.engine.dialect()
    }

    pub fn staging_settings(&self) -> &StagingSettings {
        &self.staging
    }

    /// Generate a project and stream its archive into `sink`.
    ///
    /// This is the main use case. The staging tree and the transient archive
    /// are gone when this returns, whatever the outcome.
    #[instrument(
        skip_all,
        fields(
            project = %request.project_name(),
            dialect = %self.dialect(),
            entities = request.entities().len()
        )
    )]
    pub fn generate(
        &self,
        request: &GenerationRequest,
        sink: &mut dyn Write,
    ) -> CrudsmithResult<GenerationOutcome> {
        info!("Generating {} project", self.dialect());

        let assembled = ProjectAssembler::new(
            &self.engine,
            self.filesystem.as_ref(),
            self.observer.as_ref(),
            &self.staging,
        )
        .assemble(request)?;

        let receipt = Packager::new(
            self.archiver.as_ref(),
            self.filesystem.as_ref(),
            self.observer.as_ref(),
        )
        .package(assembled.staging, sink)?;

        info!(file = %receipt.file_name, bytes = receipt.bytes, "Generation completed successfully");
        Ok(GenerationOutcome {
            dialect: self.dialect(),
            receipt,
            report: assembled.report,
        })
    }

    /// Render the artifact set without touching the filesystem.
    pub fn plan(&self, request: &GenerationRequest) -> CrudsmithResult<ProjectArtifactSet> {
        validator::validate_request(request).map_err(CrudsmithError::Domain)?;
        Ok(self.engine.render_project(request))
    }
}

//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the application needs from external systems.
//! The `crudsmith-adapters` crate provides implementations.

use std::io::Read;
use std::path::Path;

use crate::application::{ApplicationError, events::PipelineEvent};
use crate::domain::{ArtifactKind, Dialect, EntityDefinition, EntityNames, StartupScriptFlavor};
use crate::error::CrudsmithResult;

/// Port for filesystem operations.
///
/// Implemented by:
/// - `crudsmith_adapters::filesystem::LocalFilesystem` (production)
/// - `crudsmith_adapters::filesystem::MemoryFilesystem` (testing)
///
/// ## Design Notes
///
/// - Paths are absolute staging paths built by the service
/// - Permissions are capability-based, not Unix-specific
#[cfg_attr(test, mockall::automock)]
pub trait Filesystem: Send + Sync {
    /// Create a directory and all parent directories. Idempotent.
    fn create_dir_all(&self, path: &Path) -> CrudsmithResult<()>;

    /// Write content to a file, replacing any previous content.
    fn write_file(&self, path: &Path, content: &str) -> CrudsmithResult<()>;

    /// Set file permissions.
    fn set_permissions(&self, path: &Path, executable: bool) -> CrudsmithResult<()>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Open a file for streaming.
    fn open_read(&self, path: &Path) -> CrudsmithResult<Box<dyn Read + Send>>;

    /// Remove a directory and all contents.
    fn remove_dir_all(&self, path: &Path) -> CrudsmithResult<()>;

    /// Remove a single file.
    fn remove_file(&self, path: &Path) -> CrudsmithResult<()>;
}

/// Port for one dialect's source projections.
///
/// Implemented by:
/// - `crudsmith_adapters::renderer::TypeScriptRenderer`
/// - `crudsmith_adapters::renderer::JavaScriptRenderer`
///
/// Implementations must be pure: same input, byte-identical output.
#[cfg_attr(test, mockall::automock)]
pub trait TemplateRenderer: Send + Sync {
    fn dialect(&self) -> Dialect;

    /// Render one per-entity artifact.
    ///
    /// Fails with [`ApplicationError::RenderingFailed`] when the entity cannot
    /// be projected into `kind`.
    fn render_entity(
        &self,
        kind: ArtifactKind,
        entity: &EntityDefinition,
    ) -> Result<String, ApplicationError>;

    /// Render the entry point mounting every entity's route table.
    fn render_entry_point(&self, entities: &[EntityNames], project_name: &str) -> String;

    /// Render `package.json`.
    fn render_manifest(&self, project_name: &str) -> String;

    /// Render the startup script for the given shell.
    fn render_startup_script(&self, project_name: &str, flavor: StartupScriptFlavor) -> String;
}

/// Result of compressing a staging tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ArchiveSummary {
    /// Files and directories stored in the archive.
    pub entries: usize,
    /// Size of the archive file.
    pub bytes: u64,
}

/// Port for archiving a directory tree into a single file.
///
/// Implemented by:
/// - `crudsmith_adapters::archive::ZipArchiver`
#[cfg_attr(test, mockall::automock)]
pub trait Archiver: Send + Sync {
    /// Compress `source_dir` into `destination`.
    ///
    /// Entry names are relative to `source_dir`.
    fn archive(&self, source_dir: &Path, destination: &Path) -> CrudsmithResult<ArchiveSummary>;
}

/// Port for pipeline progress reporting.
///
/// Implemented by:
/// - `crate::application::events::NoopObserver`
/// - `crudsmith_adapters::observer::TracingObserver`
/// - `crudsmith_adapters::observer::RecordingObserver`
#[cfg_attr(test, mockall::automock)]
pub trait PipelineObserver: Send + Sync {
    fn on_event(&self, event: &PipelineEvent);
}

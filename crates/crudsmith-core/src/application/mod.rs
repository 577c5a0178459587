//! Application layer for crudsmith.
//!
//! This layer contains:
//! - **Services**: Use case orchestration (GenerationService and its stages)
//! - **Ports**: Interface definitions (traits) for external dependencies
//! - **Events**: Pipeline progress reported to observers
//! - **Errors**: Application-specific error types
//!
//! The application layer coordinates the domain layer but contains no
//! generation rules itself. Naming, paths and validation live in `crate::domain`.

pub mod error;
pub mod events;
pub mod payload;
pub mod ports;
pub mod services;

// Re-export main services
pub use services::{
    ArtifactWriter, AssembledProject, GenerationOutcome, GenerationService, PackageReceipt,
    Packager, ProjectAssembler, StagingSettings, TemplateEngine, WriteReport,
};

// Re-export port traits (for adapter implementation)
pub use ports::{ArchiveSummary, Archiver, Filesystem, PipelineObserver, TemplateRenderer};

pub use error::ApplicationError;
pub use events::{NoopObserver, PipelineEvent, PipelineStep};
pub use payload::GenerationPayload;

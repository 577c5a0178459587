//! Application services - orchestrate use cases.
//!
//! Services coordinate the domain layer and ports to accomplish
//! high-level use cases like "generate a project" or "plan a dry run".

pub mod artifact_writer;
pub mod assembler;
pub mod generation_service;
pub mod packager;
pub mod template_engine;

pub use artifact_writer::{ArtifactWriter, SkippedArtifact, WriteReport};
pub use assembler::{AssembledProject, ProjectAssembler, StagingSettings};
pub use generation_service::{GenerationOutcome, GenerationService};
pub use packager::{PackageReceipt, Packager};
pub use template_engine::TemplateEngine;

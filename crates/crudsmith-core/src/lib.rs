//! crudsmith Core - Hexagonal Architecture Implementation
//!
//! This crate provides the domain and application layers for the crudsmith
//! backend generator, following hexagonal (ports and adapters) architecture.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │          crudsmith-cli (CLI)            │
//! │     (Implements Driving Ports)          │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │  (GenerationService, TemplateEngine,    │
//! │   ProjectAssembler, Packager)           │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      Application Ports (Traits)         │
//! │ (Filesystem, Renderer, Archiver, Obs.)  │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │   crudsmith-adapters (Infrastructure)   │
//! │ (LocalFilesystem, ZipArchiver, renderers)│
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │        Domain Layer (Pure Logic)        │
//! │ (GenerationRequest, EntityNames,        │
//! │  ProjectArtifactSet, StagingDirectory)  │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use crudsmith_core::prelude::*;
//!
//! // 1. Build a validated request
//! let request = GenerationRequest::new(
//!     "shop",
//!     vec![EntityDefinition::new("Product").with_field(FieldDefinition::new("title", "string"))],
//! )?;
//!
//! // 2. Use application service (with injected adapters)
//! let service = GenerationService::new(renderer, filesystem, archiver);
//! let outcome = service.generate(&request, &mut std::io::stdout())?;
//! ```

pub mod domain;

pub mod application;

pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        GenerationOutcome, GenerationPayload, GenerationService, PipelineEvent, PipelineStep,
        StagingSettings,
        ports::{Archiver, Filesystem, PipelineObserver, TemplateRenderer},
    };
    pub use crate::domain::{
        ArtifactKind, Dialect, EntityDefinition, FieldDefinition, GenerationRequest,
        ProjectArtifactSet, StagingStrategy, StartupScriptFlavor,
    };
    pub use crate::error::{CrudsmithError, CrudsmithResult};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

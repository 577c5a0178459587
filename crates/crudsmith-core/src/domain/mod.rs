// ============================================================================
//  CLEAN MODULE BOUNDARIES
// ============================================================================

//! Core domain layer for crudsmith.
//!
//! This module contains pure generation rules with no I/O. Rendering,
//! filesystem access and archiving are handled via ports (traits) defined in
//! the application layer.
//!
//! ## Hexagonal Architecture Compliance
//!
//! - **No I/O**: No filesystem, network, or external calls
//! - **Few crates**: std, thiserror, serde for the wire shape, uuid for staging tokens
//! - **Immutable entities**: requests and artifact sets never change after construction
//! - **One naming rule**: every generated identifier comes from [`EntityNames`]
//!
// Public API - what the world sees
pub mod entities;
pub mod error;
pub mod naming;
pub mod value_objects;

mod validation;

pub use entities::{
    artifact::{Artifact, ArtifactSlot, ProjectArtifactSet, artifact_path},
    common::{Permissions, RelativePath},
    schema::{EntityDefinition, FieldDefinition, GenerationRequest},
    staging::{StagingDirectory, StagingStrategy},
};

pub use error::DomainError;

pub use naming::{EntityNames, capitalize, decapitalize};

pub use value_objects::{
    ArtifactKind, CrudOperation, Dialect, HttpVerb, PrimitiveType, StartupScriptFlavor,
};

pub use validation::DomainValidator;

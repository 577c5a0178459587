pub mod artifact;
pub mod common;
pub mod schema;
pub mod staging;

pub use crate::domain::DomainError;
pub use artifact::{Artifact, ArtifactSlot, ProjectArtifactSet};
pub use schema::{EntityDefinition, FieldDefinition, GenerationRequest};
pub use staging::{StagingDirectory, StagingStrategy};

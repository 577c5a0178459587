//! Inbound request contract.
//!
//! Wire shape: `{ "projectName": string, "entities": [...] }`. The key
//! `modelos` is accepted as an alias of `entities`.

use serde::{Deserialize, Serialize};

use crate::domain::{DomainError, EntityDefinition, GenerationRequest};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationPayload {
    #[serde(default)]
    pub project_name: Option<String>,
    #[serde(default, alias = "modelos")]
    pub entities: Option<Vec<EntityDefinition>>,
}

impl GenerationPayload {
    /// Replace the project name, e.g. from a command-line override.
    pub fn with_project_name(mut self, name: impl Into<String>) -> Self {
        self.project_name = Some(name.into());
        self
    }
}

impl TryFrom<GenerationPayload> for GenerationRequest {
    type Error = DomainError;

    fn try_from(payload: GenerationPayload) -> Result<Self, Self::Error> {
        let project_name = payload
            .project_name
            .ok_or(DomainError::MissingProjectName)?;
        let entities = payload.entities.ok_or_else(|| {
            DomainError::MalformedPayload("missing \"entities\" array".into())
        })?;
        GenerationRequest::new(project_name, entities)
    }
}

//! Schema model: what the caller asks us to scaffold.
//!
//! Pure data plus the invariants a request must satisfy before any file is
//! touched. Field types are deliberately not validated: they are passed
//! through verbatim into the generated sources.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::domain::{error::DomainError, naming::EntityNames, value_objects::PrimitiveType};

/// One field of an entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDefinition {
    pub name: String,
    /// Declared type, passed through verbatim.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub field_type: Option<String>,
    /// Name of another entity; turns the field into a foreign key.
    #[serde(rename = "ref", default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

impl FieldDefinition {
    pub fn new(name: impl Into<String>, field_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            field_type: Some(field_type.into()),
            reference: None,
        }
    }

    pub fn with_ref(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }

    /// Reference target, ignoring blank values.
    pub fn reference(&self) -> Option<&str> {
        self.reference.as_deref().filter(|r| !r.is_empty())
    }

    pub fn is_relation(&self) -> bool {
        self.reference().is_some()
    }

    /// Declared type, ignoring blank values.
    pub fn declared_type(&self) -> Option<&str> {
        self.field_type.as_deref().filter(|t| !t.is_empty())
    }

    /// `Some` only when the declared type is in the fixed primitive set.
    pub fn primitive(&self) -> Option<PrimitiveType> {
        self.declared_type().and_then(PrimitiveType::recognize)
    }
}

/// A user-defined data model to scaffold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityDefinition {
    pub name: String,
    #[serde(default)]
    pub fields: Vec<FieldDefinition>,
}

impl EntityDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    pub fn with_field(mut self, field: FieldDefinition) -> Self {
        self.fields.push(field);
        self
    }

    pub fn names(&self) -> EntityNames {
        EntityNames::new(&self.name)
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.name.is_empty() {
            return Err(DomainError::InvalidEntityName {
                name: self.name.clone(),
                reason: "name cannot be empty".into(),
            });
        }
        if let Some(bad) = self
            .name
            .chars()
            .find(|c| matches!(c, '/' | '\\' | '.') || c.is_whitespace())
        {
            return Err(DomainError::InvalidEntityName {
                name: self.name.clone(),
                reason: format!("contains '{}'", bad.escape_default()),
            });
        }
        Ok(())
    }
}

/// One validated scaffolding request.
///
/// Only constructible through [`GenerationRequest::new`], so holding one
/// means the invariants hold. Immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationRequest {
    project_name: String,
    entities: Vec<EntityDefinition>,
}

impl GenerationRequest {
    pub fn new(
        project_name: impl Into<String>,
        entities: Vec<EntityDefinition>,
    ) -> Result<Self, DomainError> {
        let request = Self {
            project_name: project_name.into(),
            entities,
        };
        request.validate()?;
        Ok(request)
    }

    pub fn project_name(&self) -> &str {
        &self.project_name
    }

    pub fn entities(&self) -> &[EntityDefinition] {
        &self.entities
    }

    /// Names of every entity in submission order.
    pub fn entity_names(&self) -> Vec<EntityNames> {
        self.entities.iter().map(EntityDefinition::names).collect()
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        validate_project_name(&self.project_name)?;

        if self.entities.is_empty() {
            return Err(DomainError::NoEntities);
        }

        // Two entities must not share any generated identifier, or the entry
        // point would import and mount the same route table twice.
        let mut type_names = HashSet::new();
        let mut var_prefixes = HashSet::new();
        let mut route_segments = HashSet::new();
        for entity in &self.entities {
            entity.validate()?;
            let names = entity.names();
            let clashes = !type_names.insert(names.type_name)
                | !var_prefixes.insert(names.var_prefix)
                | !route_segments.insert(names.route_segment);
            if clashes {
                return Err(DomainError::DuplicateEntity {
                    name: entity.name.clone(),
                });
            }
        }

        Ok(())
    }
}

fn validate_project_name(name: &str) -> Result<(), DomainError> {
    if name.is_empty() {
        return Err(DomainError::MissingProjectName);
    }
    let invalid = |reason: &str| DomainError::InvalidProjectName {
        name: name.into(),
        reason: reason.into(),
    };
    if name.starts_with(['-', '_', '.']) {
        return Err(invalid("must start with a letter or digit"));
    }
    if let Some(bad) = name
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '_'))
    {
        return Err(invalid(&format!(
            "'{}' is not allowed, use ASCII letters, digits, '-' and '_'",
            bad.escape_default()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product() -> EntityDefinition {
        EntityDefinition::new("Product")
            .with_field(FieldDefinition::new("title", "string"))
            .with_field(FieldDefinition::new("price", "number"))
    }

    #[test]
    fn valid_request_builds() {
        let request = GenerationRequest::new("shop", vec![product()]).unwrap();
        assert_eq!(request.project_name(), "shop");
        assert_eq!(request.entities().len(), 1);
    }

    #[test]
    fn empty_entities_is_caller_error() {
        assert_eq!(
            GenerationRequest::new("shop", vec![]),
            Err(DomainError::NoEntities)
        );
    }

    #[test]
    fn empty_project_name_is_missing() {
        assert_eq!(
            GenerationRequest::new("", vec![product()]),
            Err(DomainError::MissingProjectName)
        );
    }

    #[test]
    fn project_name_must_be_identifier_safe() {
        for bad in ["../etc", "my shop", ".hidden", "-x", "a/b", "caf\u{e9}"] {
            assert!(
                matches!(
                    GenerationRequest::new(bad, vec![product()]),
                    Err(DomainError::InvalidProjectName { .. })
                ),
                "accepted {bad:?}"
            );
        }
        for good in ["shop", "my-api", "inventory_v2", "X1"] {
            assert!(GenerationRequest::new(good, vec![product()]).is_ok(), "{good}");
        }
    }

    #[test]
    fn duplicate_entities_are_rejected_not_merged() {
        let result = GenerationRequest::new("shop", vec![product(), product()]);
        assert_eq!(
            result,
            Err(DomainError::DuplicateEntity {
                name: "Product".into()
            })
        );
    }

    #[test]
    fn names_differing_only_in_case_are_duplicates() {
        let lower = EntityDefinition::new("product").with_field(FieldDefinition::new("title", "string"));
        assert_eq!(
            GenerationRequest::new("shop", vec![product(), lower]),
            Err(DomainError::DuplicateEntity {
                name: "product".into()
            })
        );

        let shouty = EntityDefinition::new("PRODUCT");
        assert!(matches!(
            GenerationRequest::new("shop", vec![product(), shouty]),
            Err(DomainError::DuplicateEntity { .. })
        ));
    }

    #[test]
    fn distinct_entities_keep_distinct_routes() {
        let request = GenerationRequest::new(
            "shop",
            vec![product(), EntityDefinition::new("ProductLine")],
        )
        .unwrap();
        let segments: Vec<_> = request
            .entity_names()
            .into_iter()
            .map(|n| n.route_segment)
            .collect();
        assert_eq!(segments, ["product", "productline"]);
    }

    #[test]
    fn entity_name_must_be_file_safe() {
        for bad in ["", "a/b", "a.b", "Order Item"] {
            let result = GenerationRequest::new("shop", vec![EntityDefinition::new(bad)]);
            assert!(
                matches!(result, Err(DomainError::InvalidEntityName { .. })),
                "accepted {bad:?}"
            );
        }
    }

    #[test]
    fn field_without_name_passes_through() {
        let entity = EntityDefinition::new("Product").with_field(FieldDefinition::new("", "string"));
        let request = GenerationRequest::new("shop", vec![entity]).unwrap();
        assert_eq!(request.entities()[0].fields[0].name, "");
        assert_eq!(request.entities()[0].fields[0].declared_type(), Some("string"));
    }

    #[test]
    fn blank_ref_is_not_a_relation() {
        let field = FieldDefinition::new("owner", "string").with_ref("");
        assert!(!field.is_relation());
    }

    #[test]
    fn field_deserializes_from_wire_keys() {
        let field: FieldDefinition =
            serde_json::from_str(r#"{"name":"category","type":"string","ref":"Category"}"#)
                .unwrap();
        assert_eq!(field.declared_type(), Some("string"));
        assert_eq!(field.reference(), Some("Category"));

        let bare: FieldDefinition = serde_json::from_str(r#"{"name":"owner","ref":"User"}"#).unwrap();
        assert_eq!(bare.declared_type(), None);
        assert!(bare.is_relation());
    }
}

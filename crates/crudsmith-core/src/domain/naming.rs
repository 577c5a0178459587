//! The one capitalization rule every generated identifier goes through.
//!
//! Generated files import each other by name, so the interface name, the
//! service/controller/route variable names and the file stems for an entity
//! must all be derived the same way. Templates never touch `entity.name`
//! directly; they ask [`EntityNames`].

use serde::Serialize;

/// Upper-case the first character, leave the rest untouched.
pub fn capitalize(raw: &str) -> String {
    let mut chars = raw.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Lower-case the first character, leave the rest untouched.
pub fn decapitalize(raw: &str) -> String {
    let mut chars = raw.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Every name derived from one entity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct EntityNames {
    /// Entity name as submitted; used for file names and the model name.
    pub file_stem: String,
    /// Type reference: `product` -> `Product`.
    pub type_name: String,
    /// Variable prefix: `Product` -> `product`.
    pub var_prefix: String,
    /// Mount path segment: `OrderItem` -> `orderitem`.
    pub route_segment: String,
}

impl EntityNames {
    pub fn new(entity_name: &str) -> Self {
        Self {
            file_stem: entity_name.to_string(),
            type_name: capitalize(entity_name),
            var_prefix: decapitalize(entity_name),
            route_segment: entity_name.to_lowercase(),
        }
    }

    pub fn model_var(&self) -> String {
        format!("{}Model", self.type_name)
    }

    pub fn schema_var(&self) -> String {
        format!("{}Schema", self.var_prefix)
    }

    pub fn service_var(&self) -> String {
        format!("{}Service", self.var_prefix)
    }

    pub fn controller_var(&self) -> String {
        format!("{}Controller", self.var_prefix)
    }

    pub fn routes_var(&self) -> String {
        format!("{}Routes", self.var_prefix)
    }
}

// ============================================================================
// domain/error.rs - CALLER-INPUT ERROR DOMAIN
// ============================================================================

use thiserror::Error;

/// Root domain error type.
///
/// Every variant is a caller-input problem detected before any side effect
/// happens. All errors are:
/// - Cloneable (carried inside observer events)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Request shape (400-level equivalent)
    // ========================================================================
    #[error("Missing project name")]
    MissingProjectName,

    #[error("Invalid project name '{name}': {reason}")]
    InvalidProjectName { name: String, reason: String },

    #[error("Request contains no entities")]
    NoEntities,

    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    // ========================================================================
    // Entity definitions
    // ========================================================================
    #[error("Invalid entity name '{name}': {reason}")]
    InvalidEntityName { name: String, reason: String },

    #[error("Entity '{name}' is defined more than once")]
    DuplicateEntity { name: String },
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::MissingProjectName => vec![
                "Add a \"projectName\" field to the payload".into(),
                "Or pass --name on the command line".into(),
            ],
            Self::InvalidProjectName { name, reason } => vec![
                format!("Project name '{}' is invalid: {}", name, reason),
                "Use ASCII letters, digits, '-' and '_'".into(),
                "Start with a letter or digit, e.g. shop, my-api, inventory_v2".into(),
            ],
            Self::NoEntities => vec![
                "Add at least one entry to \"entities\"".into(),
                "Example: {\"name\": \"Product\", \"fields\": [{\"name\": \"title\", \"type\": \"string\"}]}".into(),
            ],
            Self::MalformedPayload(msg) => vec![
                "The schema must be a JSON object with \"projectName\" and \"entities\"".into(),
                format!("Details: {}", msg),
            ],
            Self::InvalidEntityName { name, .. } => vec![
                format!("Entity '{}' cannot be used as a type or file name", name),
                "Entity names must be non-empty and contain no '/', '\\', '.' or whitespace".into(),
            ],
            Self::DuplicateEntity { name } => vec![
                format!("Remove or rename the second definition of '{}'", name),
                "Names differing only in case clash: they share a type, variable and route".into(),
            ],
        }
    }
}

//! Domain value objects: Dialect, ArtifactKind, CrudOperation, PrimitiveType.
//!
//! # Design
//!
//! These are pure value types: `Copy`, equality-by-value, no identity.
//! Each one owns its string representation and its `FromStr` parser; the
//! tables that tie them together (which kinds a dialect emits, which verb a
//! CRUD operation maps to) live on the types themselves so every template
//! reads them from one place.

use crate::domain::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ── Dialect ──────────────────────────────────────────────────────────────────

/// Output grammar of the generated project.
///
/// Both dialects produce the same Express + Mongoose backend and honour the
/// same naming and CRUD contracts; they differ in surface syntax, file
/// extension and in which artifact kinds they emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// Statically-typed output (`.ts`), with interfaces and a service layer.
    #[default]
    TypeScript,
    /// Plain CommonJS output (`.js`), controllers talk to models directly.
    JavaScript,
}

impl Dialect {
    pub const ALL: [Dialect; 2] = [Self::TypeScript, Self::JavaScript];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::TypeScript => "typescript",
            Self::JavaScript => "javascript",
        }
    }

    pub const fn file_extension(&self) -> &'static str {
        match self {
            Self::TypeScript => "ts",
            Self::JavaScript => "js",
        }
    }

    /// Artifact kinds this dialect emits, in dependency order.
    pub const fn artifact_kinds(&self) -> &'static [ArtifactKind] {
        match self {
            Self::TypeScript => &ArtifactKind::ALL,
            Self::JavaScript => &[
                ArtifactKind::Model,
                ArtifactKind::Controller,
                ArtifactKind::Routes,
                ArtifactKind::EntryPoint,
                ArtifactKind::Manifest,
                ArtifactKind::StartupScript,
            ],
        }
    }

    /// Number of per-entity artifact kinds.
    pub fn entity_kind_count(&self) -> usize {
        self.artifact_kinds()
            .iter()
            .filter(|k| k.is_per_entity())
            .count()
    }

    /// Number of files a fully successful generation of `entities` produces.
    pub fn expected_file_count(&self, entities: usize) -> usize {
        let project_level = self.artifact_kinds().len() - self.entity_kind_count();
        self.entity_kind_count() * entities + project_level
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Dialect {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "typescript" | "ts" | "typed" => Ok(Self::TypeScript),
            "javascript" | "js" | "plain" => Ok(Self::JavaScript),
            other => Err(DomainError::MalformedPayload(format!(
                "unknown dialect: {other}"
            ))),
        }
    }
}

// ── ArtifactKind ─────────────────────────────────────────────────────────────

/// One kind of generated file.
///
/// Declaration order is dependency order: a later kind's rendered text
/// imports files produced by earlier kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ArtifactKind {
    Interface,
    Model,
    Service,
    Controller,
    Routes,
    EntryPoint,
    Manifest,
    StartupScript,
}

impl ArtifactKind {
    pub const ALL: [ArtifactKind; 8] = [
        Self::Interface,
        Self::Model,
        Self::Service,
        Self::Controller,
        Self::Routes,
        Self::EntryPoint,
        Self::Manifest,
        Self::StartupScript,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Interface => "interface",
            Self::Model => "model",
            Self::Service => "service",
            Self::Controller => "controller",
            Self::Routes => "routes",
            Self::EntryPoint => "entry-point",
            Self::Manifest => "manifest",
            Self::StartupScript => "startup-script",
        }
    }

    /// Whether one file of this kind is rendered per entity.
    pub const fn is_per_entity(&self) -> bool {
        matches!(
            self,
            Self::Interface | Self::Model | Self::Service | Self::Controller | Self::Routes
        )
    }

    /// Folder under `src/` holding per-entity artifacts of this kind.
    pub const fn folder(&self) -> Option<&'static str> {
        match self {
            Self::Interface => Some("interfaces"),
            Self::Model => Some("models"),
            Self::Service => Some("services"),
            Self::Controller => Some("controllers"),
            Self::Routes => Some("routes"),
            _ => None,
        }
    }

    /// File-name suffix between the entity name and the extension.
    pub const fn suffix(&self) -> Option<&'static str> {
        match self {
            Self::Interface => Some("interface"),
            Self::Model => Some("model"),
            Self::Service => Some("service"),
            Self::Controller => Some("controller"),
            Self::Routes => Some("routes"),
            _ => None,
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── StartupScriptFlavor ──────────────────────────────────────────────────────

/// Shell the generated startup script targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StartupScriptFlavor {
    /// Windows `start.bat`.
    #[default]
    Batch,
    /// POSIX `start.sh`.
    Shell,
}

impl StartupScriptFlavor {
    pub const fn file_name(&self) -> &'static str {
        match self {
            Self::Batch => "start.bat",
            Self::Shell => "start.sh",
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Batch => "batch",
            Self::Shell => "shell",
        }
    }
}

impl fmt::Display for StartupScriptFlavor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StartupScriptFlavor {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "batch" | "bat" | "cmd" => Ok(Self::Batch),
            "shell" | "sh" | "bash" => Ok(Self::Shell),
            other => Err(DomainError::MalformedPayload(format!(
                "unknown startup script flavor: {other}"
            ))),
        }
    }
}

// ── CRUD ─────────────────────────────────────────────────────────────────────

/// HTTP verbs used by generated route tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpVerb {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpVerb {
    /// Method name on an Express router (`router.post(...)`).
    pub const fn router_method(&self) -> &'static str {
        match self {
            Self::Get => "get",
            Self::Post => "post",
            Self::Put => "put",
            Self::Delete => "delete",
        }
    }
}

impl fmt::Display for HttpVerb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        })
    }
}

/// The five operations every entity gets, in emission order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrudOperation {
    Create,
    Get,
    List,
    Update,
    Delete,
}

impl CrudOperation {
    pub const ALL: [CrudOperation; 5] = [
        Self::Create,
        Self::Get,
        Self::List,
        Self::Update,
        Self::Delete,
    ];

    pub const fn verb(&self) -> HttpVerb {
        match self {
            Self::Create => HttpVerb::Post,
            Self::Get | Self::List => HttpVerb::Get,
            Self::Update => HttpVerb::Put,
            Self::Delete => HttpVerb::Delete,
        }
    }

    pub const fn path(&self) -> &'static str {
        match self {
            Self::Create | Self::List => "/",
            Self::Get | Self::Update | Self::Delete => "/:id",
        }
    }

    /// Whether the handler reads `req.params.id`.
    pub const fn takes_id(&self) -> bool {
        matches!(self, Self::Get | Self::Update | Self::Delete)
    }

    /// Whether the handler reads `req.body`.
    pub const fn takes_body(&self) -> bool {
        matches!(self, Self::Create | Self::Update)
    }

    /// Function name for this operation on an entity type name.
    ///
    /// `create{T}`, `get{T}`, `get{T}s`, `update{T}`, `delete{T}`.
    pub fn function_name(&self, type_name: &str) -> String {
        match self {
            Self::Create => format!("create{type_name}"),
            Self::Get => format!("get{type_name}"),
            Self::List => format!("get{type_name}s"),
            Self::Update => format!("update{type_name}"),
            Self::Delete => format!("delete{type_name}"),
        }
    }
}

// ── PrimitiveType ────────────────────────────────────────────────────────────

/// Field types the document store understands natively.
///
/// Recognition is advisory only: unknown types are passed through verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveType {
    String,
    Number,
    Boolean,
    Date,
    Buffer,
    Mixed,
    Array,
    Map,
    ObjectId,
    Decimal128,
}

impl PrimitiveType {
    /// Case-insensitive lookup; `None` for anything outside the fixed set.
    pub fn recognize(raw: &str) -> Option<Self> {
        match raw.to_ascii_lowercase().as_str() {
            "string" => Some(Self::String),
            "number" => Some(Self::Number),
            "boolean" => Some(Self::Boolean),
            "date" => Some(Self::Date),
            "buffer" => Some(Self::Buffer),
            "mixed" => Some(Self::Mixed),
            "array" => Some(Self::Array),
            "map" => Some(Self::Map),
            "objectid" => Some(Self::ObjectId),
            "decimal128" => Some(Self::Decimal128),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dialect_parses_aliases() {
        assert_eq!(Dialect::from_str("ts").unwrap(), Dialect::TypeScript);
        assert_eq!(Dialect::from_str("Typed").unwrap(), Dialect::TypeScript);
        assert_eq!(Dialect::from_str("JS").unwrap(), Dialect::JavaScript);
        assert_eq!(Dialect::from_str("plain").unwrap(), Dialect::JavaScript);
        assert!(Dialect::from_str("python").is_err());
    }

    #[test]
    fn file_counts_per_dialect() {
        assert_eq!(Dialect::TypeScript.expected_file_count(1), 8);
        assert_eq!(Dialect::TypeScript.expected_file_count(4), 23);
        assert_eq!(Dialect::JavaScript.expected_file_count(1), 6);
        assert_eq!(Dialect::JavaScript.expected_file_count(4), 15);
    }

    #[test]
    fn dialect_kinds_are_in_dependency_order() {
        for dialect in Dialect::ALL {
            let kinds = dialect.artifact_kinds();
            assert!(kinds.windows(2).all(|w| w[0] < w[1]), "{dialect}");
        }
    }

    #[test]
    fn crud_table_is_fixed() {
        let table: Vec<_> = CrudOperation::ALL
            .iter()
            .map(|op| (op.verb().to_string(), op.path(), op.function_name("Product")))
            .collect();

        assert_eq!(
            table,
            vec![
                ("POST".to_string(), "/", "createProduct".to_string()),
                ("GET".to_string(), "/:id", "getProduct".to_string()),
                ("GET".to_string(), "/", "getProducts".to_string()),
                ("PUT".to_string(), "/:id", "updateProduct".to_string()),
                ("DELETE".to_string(), "/:id", "deleteProduct".to_string()),
            ]
        );
    }

    #[test]
    fn primitive_recognition_is_case_insensitive() {
        assert_eq!(PrimitiveType::recognize("String"), Some(PrimitiveType::String));
        assert_eq!(PrimitiveType::recognize("OBJECTID"), Some(PrimitiveType::ObjectId));
        assert_eq!(PrimitiveType::recognize("uuid"), None);
    }

    #[test]
    fn per_entity_kinds_have_folders() {
        for kind in ArtifactKind::ALL {
            assert_eq!(kind.is_per_entity(), kind.folder().is_some());
            assert_eq!(kind.is_per_entity(), kind.suffix().is_some());
        }
    }
}

//! Rendered artifacts and the immutable set the template engine produces.

use std::path::PathBuf;

use crate::domain::{
    entities::common::{Permissions, RelativePath},
    naming::EntityNames,
    value_objects::{ArtifactKind, Dialect, StartupScriptFlavor},
};

/// One rendered output file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub kind: ArtifactKind,
    /// Owning entity; `None` for project-level artifacts.
    pub entity: Option<String>,
    pub path: RelativePath,
    pub content: String,
    pub permissions: Permissions,
}

impl Artifact {
    /// Size of the rendered content in bytes.
    pub fn size(&self) -> usize {
        self.content.len()
    }
}

/// Where an artifact of `kind` lives inside the staging directory.
///
/// Per-entity: `src/<folder>/<entity>.<suffix>.<ext>`. Project-level:
/// `src/index.<ext>`, `package.json`, and the startup script name.
pub fn artifact_path(
    kind: ArtifactKind,
    entity: Option<&EntityNames>,
    dialect: Dialect,
    startup: StartupScriptFlavor,
) -> RelativePath {
    let ext = dialect.file_extension();
    let path: PathBuf = match (kind.folder(), kind.suffix(), entity) {
        (Some(folder), Some(suffix), Some(names)) => ["src", folder]
            .iter()
            .collect::<PathBuf>()
            .join(format!("{}.{}.{}", names.file_stem, suffix, ext)),
        _ => match kind {
            ArtifactKind::Manifest => PathBuf::from("package.json"),
            ArtifactKind::StartupScript => PathBuf::from(startup.file_name()),
            _ => PathBuf::from("src").join(format!("index.{ext}")),
        },
    };
    RelativePath::new(path)
}

/// A rendering slot: either a file to write or a recorded skip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtifactSlot {
    Rendered(Artifact),
    Skipped {
        entity: String,
        kind: ArtifactKind,
        reason: String,
    },
}

impl ArtifactSlot {
    pub fn kind(&self) -> ArtifactKind {
        match self {
            Self::Rendered(a) => a.kind,
            Self::Skipped { kind, .. } => *kind,
        }
    }
}

/// Everything rendered for one request, in dependency order.
///
/// Built once by the template engine and never mutated; regeneration means
/// rendering a new set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectArtifactSet {
    project_name: String,
    dialect: Dialect,
    slots: Vec<ArtifactSlot>,
}

impl ProjectArtifactSet {
    pub fn new(project_name: impl Into<String>, dialect: Dialect, slots: Vec<ArtifactSlot>) -> Self {
        Self {
            project_name: project_name.into(),
            dialect,
            slots,
        }
    }

    pub fn project_name(&self) -> &str {
        &self.project_name
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn slots(&self) -> &[ArtifactSlot] {
        &self.slots
    }

    pub fn artifacts(&self) -> impl Iterator<Item = &Artifact> {
        self.slots.iter().filter_map(|s| match s {
            ArtifactSlot::Rendered(a) => Some(a),
            ArtifactSlot::Skipped { .. } => None,
        })
    }

    /// Slots of one kind, rendered and skipped, in entity order.
    pub fn of_kind(&self, kind: ArtifactKind) -> impl Iterator<Item = &ArtifactSlot> {
        self.slots.iter().filter(move |s| s.kind() == kind)
    }

    /// Look up the artifact of `kind` for `entity` (`None` = project-level).
    pub fn find(&self, kind: ArtifactKind, entity: Option<&str>) -> Option<&Artifact> {
        self.artifacts()
            .find(|a| a.kind == kind && a.entity.as_deref() == entity)
    }

    pub fn skipped(&self) -> impl Iterator<Item = &ArtifactSlot> {
        self.slots
            .iter()
            .filter(|s| matches!(s, ArtifactSlot::Skipped { .. }))
    }

    pub fn file_count(&self) -> usize {
        self.artifacts().count()
    }

    pub fn total_bytes(&self) -> usize {
        self.artifacts().map(Artifact::size).sum()
    }
}

//! Ephemeral per-request staging directories.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How staging paths are derived from the project name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StagingStrategy {
    /// `<root>/<project>-<token>`: concurrent requests never collide.
    #[default]
    Namespaced,
    /// `<root>/<project>`: two concurrent requests for the same project name
    /// race on the same directory and archive. Callers must serialize them.
    Shared,
}

impl StagingStrategy {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Namespaced => "namespaced",
            Self::Shared => "shared",
        }
    }
}

impl fmt::Display for StagingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The on-disk tree holding one request's generated project.
///
/// Owned exclusively by one request from assembly until the packager's
/// cleanup removes it together with the transient archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagingDirectory {
    root: PathBuf,
    archive_path: PathBuf,
    project_name: String,
    token: Option<String>,
}

impl StagingDirectory {
    /// Allocate staging paths under `output_root` for `project_name`.
    ///
    /// Pure: nothing is created on disk.
    pub fn allocate(
        output_root: impl AsRef<Path>,
        project_name: &str,
        strategy: StagingStrategy,
    ) -> Self {
        let token = match strategy {
            StagingStrategy::Namespaced => Some(Uuid::new_v4().simple().to_string()),
            StagingStrategy::Shared => None,
        };
        let stem = match &token {
            Some(token) => format!("{project_name}-{token}"),
            None => project_name.to_string(),
        };
        let output_root = output_root.as_ref();

        Self {
            root: output_root.join(&stem),
            archive_path: output_root.join(format!("{stem}.zip")),
            project_name: project_name.to_string(),
            token,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Transient archive file, a sibling of the staging root.
    pub fn archive_path(&self) -> &Path {
        &self.archive_path
    }

    pub fn project_name(&self) -> &str {
        &self.project_name
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// File name the caller receives: always `<project>.zip`.
    pub fn download_name(&self) -> String {
        format!("{}.zip", self.project_name)
    }

    /// Absolute location of a path relative to the staging root.
    pub fn resolve(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.root.join(relative)
    }
}

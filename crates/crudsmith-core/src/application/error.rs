//! Application layer errors.
//!
//! These errors represent failures in generation and packaging, not caller
//! input. Caller-input errors are `DomainError` from `crate::domain`.

use std::path::PathBuf;
use thiserror::Error;

use crate::{domain::ArtifactKind, error::ErrorCategory};

/// Errors that occur during pipeline orchestration.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ApplicationError {
    /// One (entity, kind) could not be projected.
    #[error("Rendering {kind} for '{entity}' failed: {reason}")]
    RenderingFailed {
        entity: String,
        kind: ArtifactKind,
        reason: String,
    },

    /// Filesystem operation failed.
    #[error("Filesystem error at {path}: {reason}")]
    FilesystemError { path: PathBuf, reason: String },

    /// The staging tree could not be compressed.
    #[error("Archiving {path} failed: {reason}")]
    ArchiveFailed { path: PathBuf, reason: String },

    /// The archive could not be streamed to the caller.
    #[error("Delivering the archive failed: {reason}")]
    DeliveryFailed { reason: String },

    /// Best-effort removal of staging artifacts failed.
    #[error("Cleanup failed for {path}: {reason}")]
    CleanupFailed { path: PathBuf, reason: String },

    /// Shared state guarded by a lock was poisoned.
    #[error("Internal lock poisoned")]
    StoreLockError,
}

impl ApplicationError {
    pub fn filesystem(path: impl Into<PathBuf>, err: impl std::fmt::Display) -> Self {
        Self::FilesystemError {
            path: path.into(),
            reason: err.to_string(),
        }
    }

    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::RenderingFailed { entity, .. } => vec![
                format!("Check the field definitions of '{}'", entity),
                "Every field needs a \"type\" or a \"ref\"".into(),
            ],
            Self::FilesystemError { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Check that you have write permissions".into(),
                "Point --staging-dir at a writable directory".into(),
            ],
            Self::ArchiveFailed { path, .. } => vec![
                format!("Could not compress {}", path.display()),
                "Check free disk space in the staging directory".into(),
            ],
            Self::DeliveryFailed { .. } => vec![
                "The archive output could not be written".into(),
                "Check the --output path or the receiving pipe".into(),
            ],
            Self::CleanupFailed { path, .. } => vec![
                format!("Remove {} manually", path.display()),
            ],
            Self::StoreLockError => vec!["Try again in a moment".into()],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::RenderingFailed { .. }
            | Self::FilesystemError { .. }
            | Self::ArchiveFailed { .. }
            | Self::DeliveryFailed { .. }
            | Self::CleanupFailed { .. } => ErrorCategory::Generation,
            Self::StoreLockError => ErrorCategory::Internal,
        }
    }
}

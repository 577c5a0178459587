//! Unified error handling for crudsmith core.
//!
//! This module provides a unified error type that wraps domain and application
//! errors, with user-actionable suggestions and a transport status mapping.

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::DomainError;

/// Root error type for crudsmith core operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CrudsmithError {
    /// Caller-input errors, detected before any side effect.
    #[error("Invalid request: {0}")]
    Domain(#[from] DomainError),

    /// Generation or packaging failures.
    #[error("Generation failed: {0}")]
    Application(#[from] ApplicationError),

    /// Configuration or setup errors.
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Unexpected internal errors (bugs).
    #[error("Internal error: {message}. This is a bug, please report it.")]
    Internal { message: String },
}

impl CrudsmithError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Domain(e) => e.suggestions(),
            Self::Application(e) => e.suggestions(),
            Self::Configuration { message } => vec![
                format!("Configuration issue: {}", message),
                "Run `crudsmith config list` to inspect the effective settings".into(),
            ],
            Self::Internal { .. } => vec!["This appears to be a bug in crudsmith".into()],
        }
    }

    /// Get error category for display/styling purposes.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Domain(_) => ErrorCategory::Validation,
            Self::Application(e) => e.category(),
            Self::Configuration { .. } => ErrorCategory::Configuration,
            Self::Internal { .. } => ErrorCategory::Internal,
        }
    }

    /// Status a request/response transport reports for this error.
    ///
    /// 400 for caller-input errors, 500 for everything else.
    pub fn http_status(&self) -> u16 {
        match self.category() {
            ErrorCategory::Validation => 400,
            _ => 500,
        }
    }

    pub fn is_caller_error(&self) -> bool {
        self.http_status() == 400
    }
}

/// Error categories for UI display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Generation,
    Configuration,
    Internal,
}

/// Convenient result type alias.
pub type CrudsmithResult<T> = Result<T, CrudsmithError>;

/// Extension trait for adding context to errors.
pub trait Context<T> {
    /// Add context to an error.
    fn context(self, msg: impl Into<String>) -> CrudsmithResult<T>;
}

impl<T, E> Context<T> for Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn context(self, msg: impl Into<String>) -> CrudsmithResult<T> {
        self.map_err(|e| CrudsmithError::Internal {
            message: format!("{}: {}", msg.into(), e),
        })
    }
}

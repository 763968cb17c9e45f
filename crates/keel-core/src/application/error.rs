//! Application layer errors.
//!
//! These errors represent failures in orchestration, not business logic.
//! Business logic errors are `DomainError` from `crate::domain`.

use std::path::PathBuf;
use thiserror::Error;

use crate::error::ErrorCategory;

/// Errors that occur during application orchestration.
#[derive(Debug, Error, Clone)]
pub enum ApplicationError {
    /// A preflight check failed; nothing was written.
    #[error("Preflight check '{check}' failed: {reason}")]
    PreflightFailed { check: String, reason: String },

    /// Filesystem operation failed.
    #[error("Filesystem error at {path}: {reason}")]
    FilesystemError { path: PathBuf, reason: String },

    /// Manifest file could not be read or parsed.
    #[error("Failed to load manifest {path}: {reason}")]
    ManifestLoad { path: PathBuf, reason: String },

    /// Manifest file does not exist.
    #[error("Manifest not found: {path}")]
    ManifestNotFound { path: PathBuf },

    /// Validation failed (application-level, not domain).
    #[error("Validation failed: {0}")]
    ValidationFailed(String),
}

impl ApplicationError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::PreflightFailed { check, .. } => vec![
                format!("'{}' is required before synthesis", check),
                "Install the missing tool or remove it from synth.preflight".into(),
            ],
            Self::FilesystemError { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Check that you have write permissions".into(),
            ],
            Self::ManifestNotFound { path } => vec![
                format!("No manifest at {}", path.display()),
                "Try: keel init".into(),
                "Or pass --manifest <path>".into(),
            ],
            Self::ManifestLoad { .. } => vec![
                "Check the manifest syntax".into(),
                "Archetype names are listed by: keel archetypes".into(),
            ],
            Self::ValidationFailed(_) => vec!["Check the error details above".into()],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::PreflightFailed { .. } => ErrorCategory::Configuration,
            Self::FilesystemError { .. } => ErrorCategory::Internal,
            Self::ManifestLoad { .. } | Self::ValidationFailed(_) => ErrorCategory::Validation,
            Self::ManifestNotFound { .. } => ErrorCategory::NotFound,
        }
    }
}

// ============================================================================
// domain/error.rs - DOMAIN ERRORS
// ============================================================================

use thiserror::Error;

/// Root domain error type.
///
/// Option resolution and component placement never fail; everything here is
/// raised while building a tree from external input or while validating the
/// artifacts produced at finalization.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Validation Errors
    // ========================================================================
    #[error("Invalid project name '{name}': {reason}")]
    InvalidProjectName { name: String, reason: String },

    #[error("Duplicate project name '{name}' in manifest")]
    DuplicateProjectName { name: String },

    #[error("Absolute paths not allowed: {path}")]
    AbsolutePathNotAllowed { path: String },

    #[error("Path escapes the project directory: {path}")]
    PathEscapesProject { path: String },

    #[error("Project '{project}' generates '{path}' more than once")]
    DuplicateArtifact { project: String, path: String },

    #[error("Invalid manifest: {0}")]
    InvalidManifest(String),

    // ========================================================================
    // Not Found Errors
    // ========================================================================
    #[error("Unknown archetype '{value}'")]
    UnknownArchetype { value: String },

    #[error("Project '{project}' names unknown parent '{parent}'")]
    UnknownParent { project: String, parent: String },

    #[error("Unknown {what} '{value}'")]
    UnknownValue { what: &'static str, value: String },

    // ========================================================================
    // Rendering
    // ========================================================================
    #[error("Failed to render '{artifact}': {reason}")]
    Serialization { artifact: String, reason: String },
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidProjectName { name, reason } => vec![
                format!("Project name '{}' is invalid: {}", name, reason),
                "Use alphanumeric characters, hyphens, and underscores".into(),
            ],
            Self::DuplicateProjectName { name } => vec![
                format!("'{}' is declared twice", name),
                "Project names are used to reference parents and must be unique".into(),
            ],
            Self::UnknownArchetype { value } => vec![
                format!("'{}' is not a known archetype", value),
                "Try: keel archetypes".into(),
            ],
            Self::UnknownParent { parent, .. } => vec![
                format!("No project named '{}' was declared before this one", parent),
                "Declare parents before their subprojects in the manifest".into(),
            ],
            Self::DuplicateArtifact { path, .. } => vec![
                format!("Two components write '{}'", path),
                "Check that subproject output directories do not overlap".into(),
            ],
            Self::AbsolutePathNotAllowed { .. } | Self::PathEscapesProject { .. } => vec![
                "Output directories must be relative to the parent project".into(),
            ],
            _ => vec!["See documentation for more details".into()],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidProjectName { .. }
            | Self::DuplicateProjectName { .. }
            | Self::AbsolutePathNotAllowed { .. }
            | Self::PathEscapesProject { .. }
            | Self::DuplicateArtifact { .. }
            | Self::InvalidManifest(_) => ErrorCategory::Validation,
            Self::UnknownArchetype { .. }
            | Self::UnknownParent { .. }
            | Self::UnknownValue { .. } => ErrorCategory::NotFound,
            Self::Serialization { .. } => ErrorCategory::Internal,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    NotFound,
    Internal,
}

//! Driven (output) ports - implemented by infrastructure.
//!
//! The `keel-adapters` crate provides implementations.

use std::path::Path;

use crate::error::KeelResult;

/// Port for filesystem operations.
///
/// Implemented by:
/// - `keel_adapters::filesystem::LocalFilesystem` (production)
/// - `keel_adapters::filesystem::MemoryFilesystem` (testing, dry runs)
#[cfg_attr(test, mockall::automock)]
pub trait Filesystem: Send + Sync {
    /// Create a directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> KeelResult<()>;

    /// Write content to a file, replacing any existing content.
    fn write_file(&self, path: &Path, content: &str) -> KeelResult<()>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;
}

/// Port for a check that must pass before anything is synthesized.
///
/// Implemented by `keel_adapters::preflight::BinaryOnPath` and anything
/// else that validates the environment.
#[cfg_attr(test, mockall::automock)]
pub trait Preflight: Send + Sync {
    /// Short name used in logs and error messages.
    fn name(&self) -> String;

    /// Run the check. An error aborts synthesis.
    fn check(&self) -> KeelResult<()>;
}

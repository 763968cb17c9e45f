//! Infrastructure adapters for keel.
//!
//! This crate implements the ports defined in `keel_core::application::ports`.
//! It contains all external dependencies and I/O operations.

pub mod filesystem;
pub mod manifest_loader;
pub mod preflight;

// Re-export commonly used adapters
pub use filesystem::{LocalFilesystem, MemoryFilesystem};
pub use manifest_loader::{DEFAULT_MANIFEST, ManifestLoader};
pub use preflight::BinaryOnPath;

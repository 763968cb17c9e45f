//! Application layer for keel.
//!
//! This layer contains:
//! - **Services**: Use case orchestration (SynthesisService, ArchetypeCatalog)
//! - **Ports**: Interface definitions (traits) for external dependencies
//! - **Errors**: Application-specific error types
//!
//! The application layer coordinates the domain layer but contains no
//! business logic itself. All composition rules live in `crate::domain`.

pub mod error;
pub mod ports;
pub mod services;

pub use services::{ArchetypeCatalog, ArchetypeInfo, SynthesisReport, SynthesisService};

pub use ports::{Filesystem, Preflight};

pub use error::ApplicationError;

//! Keel Core - Hexagonal Architecture Implementation
//!
//! This crate provides the domain and application layers for keel, a
//! configuration-composition engine for infrastructure project trees.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │             keel-cli (CLI)              │
//! │       (Implements Driving Ports)        │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │  (SynthesisService, ArchetypeCatalog)   │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │       Application Ports (Traits)        │
//! │        (Driven: Filesystem, Preflight)  │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      keel-adapters (Infrastructure)     │
//! │ (LocalFilesystem, MemoryFilesystem, ..) │
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │        Domain Layer (Pure Logic)        │
//! │ (ProjectTree, OptionsResolver, Placement)│
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use keel_core::domain::{Archetype, ProjectSpec, ProjectTree, RelativePath};
//!
//! let mut tree = ProjectTree::new();
//! let root = tree
//!     .add_project(ProjectSpec::new("platform", Archetype::NxMonorepo))
//!     .unwrap()
//!     .id;
//! tree.add_project(
//!     ProjectSpec::new("cluster", Archetype::Cdk8sApp)
//!         .outdir(RelativePath::try_new("packages/cluster").unwrap())
//!         .parent(root),
//! )
//! .unwrap();
//!
//! let synthesis = tree.finalize().unwrap();
//! for (path, artifact) in synthesis.files() {
//!     println!("{} ({})", path.display(), artifact.format().as_str());
//! }
//! ```

pub mod domain;

pub mod application;

pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        ArchetypeCatalog, ArchetypeInfo, SynthesisReport, SynthesisService,
        ports::{Filesystem, Preflight},
    };
    pub use crate::domain::{
        Archetype, ComponentPlacementResolver, FileArtifact, NodeId, OptionsResolver,
        ProjectOptions, ProjectSpec, ProjectTree, RelativePath, Synthesis, TreeManifest,
    };
    pub use crate::error::{KeelError, KeelResult};
}

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

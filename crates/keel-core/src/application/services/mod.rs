//! Application services - orchestrate use cases.
//!
//! Services coordinate the domain layer and ports to accomplish
//! high-level use cases like "synthesize a tree" or "list archetypes".

pub mod archetype_catalog;
pub mod synthesis_service;

pub use archetype_catalog::{ArchetypeCatalog, ArchetypeInfo};
pub use synthesis_service::{SynthesisReport, SynthesisService};

//! Archetype Catalog - read-only archetype metadata.
//!
//! Separated from SynthesisService for single responsibility.

use serde::Serialize;

use crate::domain::{ARCHETYPE_REGISTRY, Archetype, ArchetypeDef};

/// Information about an archetype for display purposes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArchetypeInfo {
    pub id: String,
    pub flavour: String,
    pub description: String,
    pub library: bool,
    pub owns_build_graph: bool,
}

impl From<&ArchetypeDef> for ArchetypeInfo {
    fn from(def: &ArchetypeDef) -> Self {
        Self {
            id: def.archetype.to_string(),
            flavour: def.flavour.as_str().to_string(),
            description: def.description.to_string(),
            library: def.library,
            owns_build_graph: def.owns_build_graph,
        }
    }
}

/// Service for archetype queries.
#[derive(Debug, Default, Clone, Copy)]
pub struct ArchetypeCatalog;

impl ArchetypeCatalog {
    pub fn new() -> Self {
        Self
    }

    /// List all archetypes in registry order.
    pub fn list(&self) -> Vec<ArchetypeInfo> {
        ARCHETYPE_REGISTRY.iter().map(ArchetypeInfo::from).collect()
    }

    /// Look up one archetype by name or alias.
    pub fn get(&self, name: &str) -> crate::error::KeelResult<ArchetypeInfo> {
        let archetype: Archetype = name.parse()?;
        Ok(archetype.def().into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_every_archetype() {
        let list = ArchetypeCatalog::new().list();
        assert_eq!(list.len(), Archetype::ALL.len());
        assert!(list.iter().any(|a| a.id == "nx-monorepo" && a.owns_build_graph));
    }

    #[test]
    fn get_resolves_aliases() {
        let info = ArchetypeCatalog::new().get("monorepo").unwrap();
        assert_eq!(info.id, "nx-monorepo");
        assert!(ArchetypeCatalog::new().get("helm").is_err());
    }
}

//! Declarative description of a project tree.
//!
//! A manifest names one root project and any number of subprojects. Parents
//! are referenced by name and must be declared before their children, so a
//! single pass builds the tree top-down.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::common::RelativePath;
use crate::domain::construct::ProjectSpec;
use crate::domain::error::DomainError;
use crate::domain::options::ProjectOptions;
use crate::domain::tree::{NodeId, ProjectTree};
use crate::domain::value_objects::Archetype;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ManifestProject {
    pub name: String,
    pub archetype: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outdir: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    #[serde(default)]
    pub options: ProjectOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TreeManifest {
    pub project: ManifestProject,
    #[serde(default)]
    pub subprojects: Vec<ManifestProject>,
}

impl TreeManifest {
    /// Check names, archetypes and parent references without building.
    pub fn validate(&self) -> Result<(), DomainError> {
        let mut declared = HashSet::new();
        for entry in self.entries() {
            entry.archetype.parse::<Archetype>()?;
            if !declared.insert(entry.name.as_str()) {
                return Err(DomainError::DuplicateProjectName {
                    name: entry.name.clone(),
                });
            }
        }
        if self.project.parent.is_some() {
            return Err(DomainError::InvalidManifest(
                "the root project cannot have a parent".into(),
            ));
        }
        Ok(())
    }

    /// Root first, then subprojects in declaration order.
    pub fn entries(&self) -> impl Iterator<Item = &ManifestProject> {
        std::iter::once(&self.project).chain(self.subprojects.iter())
    }

    /// Construct the tree described by this manifest.
    pub fn build(&self) -> Result<ProjectTree, DomainError> {
        self.validate()?;

        let mut tree = ProjectTree::new();
        let mut ids: BTreeMap<&str, NodeId> = BTreeMap::new();

        let root = tree.add_project(Self::spec(&self.project, None)?)?.id;
        ids.insert(self.project.name.as_str(), root);

        for entry in &self.subprojects {
            let parent = match entry.parent.as_deref() {
                None => root,
                Some(name) => *ids.get(name).ok_or_else(|| DomainError::UnknownParent {
                    project: entry.name.clone(),
                    parent: name.to_string(),
                })?,
            };
            let id = tree.add_project(Self::spec(entry, Some(parent))?)?.id;
            debug!(project = %entry.name, node = %id, parent = %parent, "Added subproject");
            ids.insert(entry.name.as_str(), id);
        }

        Ok(tree)
    }

    fn spec(entry: &ManifestProject, parent: Option<NodeId>) -> Result<ProjectSpec, DomainError> {
        let archetype = entry.archetype.parse::<Archetype>()?;
        let outdir = match (&entry.outdir, parent) {
            (Some(dir), _) => RelativePath::try_new(dir)?,
            (None, None) => RelativePath::current(),
            (None, Some(_)) => RelativePath::try_new(format!("packages/{}", entry.name))?,
        };

        let mut spec = ProjectSpec::new(&entry.name, archetype)
            .outdir(outdir)
            .options(entry.options.clone());
        if let Some(parent) = parent {
            spec = spec.parent(parent);
        }
        Ok(spec)
    }
}

//! Finalization: the second and last phase of a tree's life.
//!
//! [`ProjectTree::finalize`] consumes the tree, so no contribution can arrive
//! after rendering and no tree can be finalized twice.

use std::collections::BTreeSet;
use std::path::PathBuf;

use tracing::{debug, instrument};

use crate::domain::artifact::FileArtifact;
use crate::domain::common::RelativePath;
use crate::domain::components::{ComponentKind, Finalize};
use crate::domain::error::DomainError;
use crate::domain::tree::ProjectTree;
use crate::domain::value_objects::Archetype;

/// Everything one project produces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectOutput {
    pub name: String,
    pub archetype: Archetype,
    /// Directory relative to the synthesis root.
    pub outdir: RelativePath,
    pub components: Vec<ComponentKind>,
    pub artifacts: Vec<FileArtifact>,
}

impl ProjectOutput {
    pub fn artifact(&self, path: &str) -> Option<&FileArtifact> {
        self.artifacts.iter().find(|a| a.path().to_str() == Some(path))
    }

    /// Reject absolute, escaping and duplicate artifact paths.
    pub fn validate(&self) -> Result<(), DomainError> {
        let mut seen = BTreeSet::new();
        for artifact in &self.artifacts {
            let path = RelativePath::try_new(artifact.path())?;
            if !seen.insert(path) {
                return Err(DomainError::DuplicateArtifact {
                    project: self.name.clone(),
                    path: artifact.path().display().to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Rendered output of a whole tree, in tree order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Synthesis {
    pub projects: Vec<ProjectOutput>,
}

impl Synthesis {
    pub fn project(&self, name: &str) -> Option<&ProjectOutput> {
        self.projects.iter().find(|p| p.name == name)
    }

    pub fn artifact_count(&self) -> usize {
        self.projects.iter().map(|p| p.artifacts.len()).sum()
    }

    /// Every artifact with its path relative to the synthesis root.
    pub fn files(&self) -> impl Iterator<Item = (PathBuf, &FileArtifact)> {
        self.projects.iter().flat_map(|p| {
            p.artifacts
                .iter()
                .map(move |a| (p.outdir.as_path().join(a.path()), a))
        })
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        self.projects.iter().try_for_each(ProjectOutput::validate)?;

        let mut seen = BTreeSet::new();
        for (path, _) in self.files() {
            if !seen.insert(path.clone()) {
                return Err(DomainError::DuplicateArtifact {
                    project: "<tree>".to_string(),
                    path: path.display().to_string(),
                });
            }
        }
        Ok(())
    }
}

impl ProjectTree {
    /// Render every node in tree order: construction-time artifacts, then
    /// each component once, then the task, dependency and ignore files.
    #[instrument(skip_all, fields(projects = self.len()))]
    pub fn finalize(self) -> Result<Synthesis, DomainError> {
        let order = self.preorder();
        let outdirs: Vec<RelativePath> = order.iter().map(|id| self.full_outdir(*id)).collect();

        let mut nodes: Vec<Option<_>> = self.into_nodes().into_iter().map(Some).collect();
        let mut projects = Vec::with_capacity(order.len());

        for (id, outdir) in order.into_iter().zip(outdirs) {
            let Some(node) = nodes.get_mut(id.index()).and_then(Option::take) else {
                continue;
            };
            let (parts, components) = node.into_parts();

            let mut artifacts = parts.artifacts;
            for component in components.iter() {
                let rendered = component.render()?;
                debug!(
                    project = %parts.name,
                    component = %component.kind(),
                    files = rendered.len(),
                    "Rendered component"
                );
                artifacts.extend(rendered);
            }
            if !parts.tasks.is_empty() {
                artifacts.push(parts.tasks.render()?);
            }
            if !parts.deps.is_empty() {
                artifacts.push(parts.deps.render()?);
            }
            if !parts.gitignore.is_empty() {
                artifacts.push(parts.gitignore.render());
            }

            projects.push(ProjectOutput {
                name: parts.name,
                archetype: parts.archetype,
                outdir,
                components: components.kinds().collect(),
                artifacts,
            });
        }

        Ok(Synthesis { projects })
    }
}

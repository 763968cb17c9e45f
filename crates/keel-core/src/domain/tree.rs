//! The project tree: an arena of nodes addressed by [`NodeId`].
//!
//! Node identity is the id, never the name. Parent links are ids into the
//! same arena, so walking to the root or to a parent is an index lookup.

use std::fmt;
use std::ops::{Index, IndexMut};

use crate::domain::artifact::{FileArtifact, IgnoreFile};
use crate::domain::common::RelativePath;
use crate::domain::components::{
    Attached, BuildGraphRegistry, ComponentHandle, ComponentRegistry, ComponentType, NodeSetup,
};
use crate::domain::error::DomainError;
use crate::domain::options::ResolvedOptions;
use crate::domain::tasks::{DependencySet, TaskRegistry};
use crate::domain::value_objects::Archetype;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub(crate) const fn from_index(index: usize) -> Self {
        Self(index)
    }

    pub const fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One project in the tree.
#[derive(Debug, Clone)]
pub struct ProjectNode {
    id: NodeId,
    name: String,
    archetype: Archetype,
    outdir: RelativePath,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    options: ResolvedOptions,
    pub components: ComponentRegistry,
    pub tasks: TaskRegistry,
    pub deps: DependencySet,
    pub gitignore: IgnoreFile,
    artifacts: Vec<FileArtifact>,
}

impl ProjectNode {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn archetype(&self) -> Archetype {
        self.archetype
    }

    /// Output directory relative to the parent (or to the synthesis root).
    pub fn outdir(&self) -> &RelativePath {
        &self.outdir
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn options(&self) -> &ResolvedOptions {
        &self.options
    }

    pub fn is_subproject(&self) -> bool {
        self.parent.is_some()
    }

    /// Construction-time artifacts (not including component output).
    pub fn artifacts(&self) -> &[FileArtifact] {
        &self.artifacts
    }

    pub fn add_artifact(&mut self, artifact: FileArtifact) {
        self.artifacts.push(artifact);
    }

    pub fn component<T: ComponentType>(&self) -> Option<&T> {
        self.components.get::<T>()
    }

    pub fn component_mut<T: ComponentType>(&mut self) -> Option<&mut T> {
        self.components.get_mut::<T>()
    }

    /// Find-or-create the component of type `T`.
    ///
    /// `create` only runs when no instance exists; it gets a [`NodeSetup`]
    /// to register tasks, dependencies and files on this node.
    pub fn ensure_component<T, F>(&mut self, create: F) -> Attached
    where
        T: ComponentType,
        F: FnOnce(&mut NodeSetup<'_>) -> T,
    {
        let handle = ComponentHandle {
            node: self.id,
            kind: T::KIND,
        };
        if self.components.contains(T::KIND) {
            return Attached {
                handle,
                created: false,
            };
        }

        let mut setup = NodeSetup {
            options: &self.options,
            tasks: &mut self.tasks,
            deps: &mut self.deps,
            artifacts: &mut self.artifacts,
        };
        let component = create(&mut setup);
        let created = self.components.insert_if_absent(component.into());
        Attached { handle, created }
    }

    pub(crate) fn into_parts(self) -> (NodeParts, ComponentRegistry) {
        (
            NodeParts {
                name: self.name,
                archetype: self.archetype,
                tasks: self.tasks,
                deps: self.deps,
                gitignore: self.gitignore,
                artifacts: self.artifacts,
            },
            self.components,
        )
    }
}

pub(crate) struct NodeParts {
    pub name: String,
    pub archetype: Archetype,
    pub tasks: TaskRegistry,
    pub deps: DependencySet,
    pub gitignore: IgnoreFile,
    pub artifacts: Vec<FileArtifact>,
}

/// Validate a project name.
pub fn validate_project_name(name: &str) -> Result<(), DomainError> {
    let invalid = |reason: &str| DomainError::InvalidProjectName {
        name: name.to_string(),
        reason: reason.to_string(),
    };

    if name.trim().is_empty() {
        return Err(invalid("name cannot be empty"));
    }
    if name.len() > 214 {
        return Err(invalid("name cannot exceed 214 characters"));
    }
    if name.starts_with('.') || name.starts_with('-') {
        return Err(invalid("name cannot start with '.' or '-'"));
    }
    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '@' | '/'))
    {
        return Err(invalid("name contains invalid characters"));
    }
    Ok(())
}

/// Arena of project nodes. Roots have no parent; a tree may hold several.
#[derive(Debug, Clone, Default)]
pub struct ProjectTree {
    nodes: Vec<ProjectNode>,
}

impl ProjectTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a node. `parent` must already be in this tree.
    pub fn add_node(
        &mut self,
        name: &str,
        archetype: Archetype,
        outdir: RelativePath,
        parent: Option<NodeId>,
        options: ResolvedOptions,
    ) -> Result<NodeId, DomainError> {
        validate_project_name(name)?;
        if let Some(parent) = parent.filter(|p| self.get(*p).is_none()) {
            return Err(DomainError::UnknownParent {
                project: name.to_string(),
                parent: parent.to_string(),
            });
        }

        let id = NodeId(self.nodes.len());
        self.nodes.push(ProjectNode {
            id,
            name: name.to_string(),
            archetype,
            outdir,
            parent,
            children: Vec::new(),
            options,
            components: ComponentRegistry::new(),
            tasks: TaskRegistry::new(),
            deps: DependencySet::new(),
            gitignore: IgnoreFile::new(),
            artifacts: Vec::new(),
        });
        if let Some(parent) = parent {
            self.nodes[parent.0].children.push(id);
        }
        Ok(id)
    }

    pub fn get(&self, id: NodeId) -> Option<&ProjectNode> {
        self.nodes.get(id.0)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut ProjectNode> {
        self.nodes.get_mut(id.0)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn find_by_name(&self, name: &str) -> Option<NodeId> {
        self.nodes.iter().find(|n| n.name == name).map(|n| n.id)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent)
    }

    /// Root-most ancestor of `id` (itself when it has no parent).
    pub fn root_of(&self, id: NodeId) -> NodeId {
        let mut current = id;
        while let Some(parent) = self.parent(current) {
            current = parent;
        }
        current
    }

    pub fn roots(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.iter().filter(|n| n.parent.is_none()).map(|n| n.id)
    }

    /// All nodes, each root followed by its subtree depth-first in child
    /// insertion order.
    pub fn preorder(&self) -> Vec<NodeId> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack: Vec<NodeId> = self.roots().collect();
        stack.reverse();
        while let Some(id) = stack.pop() {
            order.push(id);
            stack.extend(self[id].children.iter().rev().copied());
        }
        order
    }

    /// Output directory of `id` relative to the synthesis root.
    pub fn full_outdir(&self, id: NodeId) -> RelativePath {
        let mut chain = Vec::new();
        let mut current = Some(id);
        while let Some(node) = current.and_then(|c| self.get(c)) {
            chain.push(&node.outdir);
            current = node.parent;
        }
        chain
            .into_iter()
            .rev()
            .fold(RelativePath::current(), |acc, part| acc.join(part))
    }

    pub fn component<T: ComponentType>(&self, handle: ComponentHandle) -> Option<&T> {
        self.get(handle.node).and_then(|n| n.component::<T>())
    }

    pub fn component_mut<T: ComponentType>(&mut self, handle: ComponentHandle) -> Option<&mut T> {
        self.get_mut(handle.node).and_then(|n| n.component_mut::<T>())
    }

    /// The build graph owned by the root of `id`'s tree, if any.
    pub fn build_graph_mut(&mut self, id: NodeId) -> Option<&mut BuildGraphRegistry> {
        let root = self.root_of(id);
        self.get_mut(root).and_then(|n| n.component_mut::<BuildGraphRegistry>())
    }

    pub fn build_graph(&self, id: NodeId) -> Option<&BuildGraphRegistry> {
        self.get(self.root_of(id)).and_then(|n| n.component::<BuildGraphRegistry>())
    }

    pub(crate) fn into_nodes(self) -> Vec<ProjectNode> {
        self.nodes
    }
}

impl Index<NodeId> for ProjectTree {
    type Output = ProjectNode;

    fn index(&self, id: NodeId) -> &Self::Output {
        &self.nodes[id.0]
    }
}

impl IndexMut<NodeId> for ProjectTree {
    fn index_mut(&mut self, id: NodeId) -> &mut Self::Output {
        &mut self.nodes[id.0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::components::EditorSettings;
    use crate::domain::options::{OptionsResolver, ProjectOptions, TreePosition};

    fn add(tree: &mut ProjectTree, name: &str, outdir: &str, parent: Option<NodeId>) -> NodeId {
        let options = OptionsResolver::resolve(
            &ProjectOptions::default(),
            Archetype::CdkApp,
            TreePosition::from_parent(parent),
        );
        tree.add_node(
            name,
            Archetype::CdkApp,
            RelativePath::try_new(outdir).unwrap(),
            parent,
            options,
        )
        .unwrap()
    }

    #[test]
    fn root_of_walks_to_top() {
        let mut tree = ProjectTree::new();
        let root = add(&mut tree, "root", ".", None);
        let mid = add(&mut tree, "mid", "packages/mid", Some(root));
        let leaf = add(&mut tree, "leaf", "leaf", Some(mid));

        assert_eq!(tree.root_of(leaf), root);
        assert_eq!(tree.root_of(root), root);
        assert_eq!(tree[root].children(), &[mid]);
    }

    #[test]
    fn full_outdir_joins_ancestors() {
        let mut tree = ProjectTree::new();
        let root = add(&mut tree, "root", ".", None);
        let mid = add(&mut tree, "mid", "packages/mid", Some(root));
        let leaf = add(&mut tree, "leaf", "leaf", Some(mid));

        assert_eq!(tree.full_outdir(leaf).to_string(), "packages/mid/leaf");
        assert!(tree.full_outdir(root).is_current());
    }

    #[test]
    fn preorder_visits_parents_before_children() {
        let mut tree = ProjectTree::new();
        let root = add(&mut tree, "root", ".", None);
        let a = add(&mut tree, "a", "a", Some(root));
        let b = add(&mut tree, "b", "b", Some(root));
        let a1 = add(&mut tree, "a1", "a1", Some(a));

        assert_eq!(tree.preorder(), vec![root, a, a1, b]);
    }

    #[test]
    fn ensure_component_is_find_or_create() {
        let mut tree = ProjectTree::new();
        let root = add(&mut tree, "root", ".", None);

        let first = tree[root].ensure_component(|_| EditorSettings::new());
        let second = tree[root].ensure_component(|_| EditorSettings::new());

        assert!(first.created);
        assert!(!second.created);
        assert_eq!(first.handle, second.handle);
        assert_eq!(tree[root].components.len(), 1);
    }

    #[test]
    fn rejects_invalid_names() {
        assert!(validate_project_name("").is_err());
        assert!(validate_project_name("-bad").is_err());
        assert!(validate_project_name("has space").is_err());
        assert!(validate_project_name("@org/cluster").is_ok());
        assert!(validate_project_name("platform_api").is_ok());
    }
}

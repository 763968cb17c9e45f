//! Cross-cutting components attached to project nodes.
//!
//! Each node owns a [`ComponentRegistry`] holding at most one instance per
//! [`ComponentKind`]. Components accumulate contributions during construction
//! and render their artifacts exactly once, through [`Finalize::render`],
//! when the tree is finalized.

pub mod agents_guide;
pub mod build_graph;
pub mod commit_tooling;
pub mod container_manifest;
pub mod editor_settings;
pub mod local_cluster;

use std::collections::BTreeMap;
use std::fmt;

use crate::domain::artifact::FileArtifact;
use crate::domain::error::DomainError;
use crate::domain::options::ResolvedOptions;
use crate::domain::tasks::{DependencySet, TaskRegistry};
use crate::domain::tree::NodeId;

pub use agents_guide::AgentsGuide;
pub use build_graph::{BuildGraphRegistry, NamedInputEntry, NxInput, TargetDefault, TaskRunner};
pub use commit_tooling::{CommitTooling, Scope};
pub use container_manifest::ContainerManifest;
pub use editor_settings::EditorSettings;
pub use local_cluster::LocalCluster;

/// Tag identifying a component type. The registry key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ComponentKind {
    EditorSettings,
    CommitTooling,
    BuildGraph,
    ContainerManifest,
    AgentsGuide,
    LocalCluster,
}

impl ComponentKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::EditorSettings => "editor-settings",
            Self::CommitTooling => "commit-tooling",
            Self::BuildGraph => "build-graph",
            Self::ContainerManifest => "container-manifest",
            Self::AgentsGuide => "agents-guide",
            Self::LocalCluster => "local-cluster",
        }
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Late rendering of accumulated state.
///
/// `render` takes `&self` so it cannot change the component; calling it
/// again yields identical artifacts.
pub trait Finalize {
    fn render(&self) -> Result<Vec<FileArtifact>, DomainError>;
}

/// A component instance stored in a node's registry.
#[derive(Debug, Clone)]
pub enum Component {
    EditorSettings(EditorSettings),
    CommitTooling(CommitTooling),
    BuildGraph(BuildGraphRegistry),
    ContainerManifest(ContainerManifest),
    AgentsGuide(AgentsGuide),
    LocalCluster(LocalCluster),
}

impl Component {
    pub fn kind(&self) -> ComponentKind {
        match self {
            Self::EditorSettings(_) => ComponentKind::EditorSettings,
            Self::CommitTooling(_) => ComponentKind::CommitTooling,
            Self::BuildGraph(_) => ComponentKind::BuildGraph,
            Self::ContainerManifest(_) => ComponentKind::ContainerManifest,
            Self::AgentsGuide(_) => ComponentKind::AgentsGuide,
            Self::LocalCluster(_) => ComponentKind::LocalCluster,
        }
    }
}

impl Finalize for Component {
    fn render(&self) -> Result<Vec<FileArtifact>, DomainError> {
        match self {
            Self::EditorSettings(c) => c.render(),
            Self::CommitTooling(c) => c.render(),
            Self::BuildGraph(c) => c.render(),
            Self::ContainerManifest(c) => c.render(),
            Self::AgentsGuide(c) => c.render(),
            Self::LocalCluster(c) => c.render(),
        }
    }
}

/// Typed access into a [`Component`].
pub trait ComponentType: Sized + Into<Component> {
    const KIND: ComponentKind;

    fn from_ref(component: &Component) -> Option<&Self>;
    fn from_mut(component: &mut Component) -> Option<&mut Self>;
}

macro_rules! component_type {
    ($ty:ty, $variant:ident) => {
        impl From<$ty> for Component {
            fn from(value: $ty) -> Self {
                Component::$variant(value)
            }
        }

        impl ComponentType for $ty {
            const KIND: ComponentKind = ComponentKind::$variant;

            fn from_ref(component: &Component) -> Option<&Self> {
                match component {
                    Component::$variant(inner) => Some(inner),
                    _ => None,
                }
            }

            fn from_mut(component: &mut Component) -> Option<&mut Self> {
                match component {
                    Component::$variant(inner) => Some(inner),
                    _ => None,
                }
            }
        }
    };
}

component_type!(EditorSettings, EditorSettings);
component_type!(CommitTooling, CommitTooling);
component_type!(BuildGraphRegistry, BuildGraph);
component_type!(ContainerManifest, ContainerManifest);
component_type!(AgentsGuide, AgentsGuide);
component_type!(LocalCluster, LocalCluster);

/// At most one component per kind.
#[derive(Debug, Clone, Default)]
pub struct ComponentRegistry {
    components: BTreeMap<ComponentKind, Component>,
}

impl ComponentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, kind: ComponentKind) -> bool {
        self.components.contains_key(&kind)
    }

    pub fn get<T: ComponentType>(&self) -> Option<&T> {
        self.components.get(&T::KIND).and_then(T::from_ref)
    }

    pub fn get_mut<T: ComponentType>(&mut self) -> Option<&mut T> {
        self.components.get_mut(&T::KIND).and_then(T::from_mut)
    }

    pub fn kinds(&self) -> impl Iterator<Item = ComponentKind> + '_ {
        self.components.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Component> {
        self.components.values()
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Insert unless a component of the same kind exists. Returns whether the
    /// value was inserted.
    pub(crate) fn insert_if_absent(&mut self, component: Component) -> bool {
        let kind = component.kind();
        if self.components.contains_key(&kind) {
            return false;
        }
        self.components.insert(kind, component);
        true
    }
}

/// Reference to a component instance on a specific node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ComponentHandle {
    pub node: NodeId,
    pub kind: ComponentKind,
}

/// Result of a find-or-create.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Attached {
    pub handle: ComponentHandle,
    pub created: bool,
}

/// Mutable view of a node's registries, handed to component constructors so
/// they can register tasks, dependencies and construction-time files.
pub struct NodeSetup<'a> {
    pub options: &'a ResolvedOptions,
    pub tasks: &'a mut TaskRegistry,
    pub deps: &'a mut DependencySet,
    pub artifacts: &'a mut Vec<FileArtifact>,
}

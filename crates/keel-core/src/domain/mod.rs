// ============================================================================
//  CLEAN MODULE BOUNDARIES
// ============================================================================

//! Core domain layer for keel.
//!
//! Pure configuration-composition logic: the project tree, option
//! resolution, component placement, the accumulating components and the
//! finalization pass that renders them. No I/O happens here; rendered
//! artifacts are written by the application layer through ports.
//!
//! ## Lifecycle
//!
//! - **Construction**: `ProjectTree::add_project` resolves options, wires the
//!   archetype and places shared components. Components keep accepting
//!   contributions for as long as the tree is alive.
//! - **Finalization**: `ProjectTree::finalize` consumes the tree and renders
//!   every component exactly once, in tree order.
pub mod artifact;
pub mod capabilities;
pub mod common;
pub mod components;
pub mod construct;
pub mod error;
pub mod finalize;
pub mod manifest;
pub mod options;
pub mod placement;
pub mod providers;
pub mod tasks;
pub mod tree;
pub mod value_objects;

pub use artifact::{ArtifactFormat, FileArtifact, IgnoreFile};
pub use capabilities::{ARCHETYPE_REGISTRY, ArchetypeDef, Flavour};
pub use common::RelativePath;
pub use components::{
    AgentsGuide, Attached, BuildGraphRegistry, CommitTooling, Component, ComponentHandle,
    ComponentKind, ComponentRegistry, ComponentType, ContainerManifest, EditorSettings, Finalize,
    LocalCluster, NamedInputEntry, NodeSetup, NxInput, Scope, TargetDefault, TaskRunner,
};
pub use construct::{Project, ProjectSpec};
pub use error::{DomainError, ErrorCategory};
pub use finalize::{ProjectOutput, Synthesis};
pub use manifest::{ManifestProject, TreeManifest};
pub use options::{
    ContainerOptions, EslintOptions, K3sArg, LocalClusterOptions, OptionsResolver,
    PrettierOptions, PrettierSettings, ProjectOptions, ResolvedLocalCluster, ResolvedOptions,
    ResolvedPrettierSettings, TreePosition,
};
pub use placement::{ComponentPlacementResolver, Placement, PlacementRequest};
pub use providers::{
    HetznerConfig, HetznerProvider, PollFunction, ProviderStrategy, TerraformProvider,
};
pub use tasks::{Dependency, DependencySet, StepAction, Task, TaskInsert, TaskRegistry, TaskStep};
pub use tree::{NodeId, ProjectNode, ProjectTree};
pub use value_objects::{
    Archetype, DependencyKind, K8sVersion, NxVersion, PackageManager, TrailingComma,
};

#[cfg(test)]
mod tests {
    use super::*;

    // ========================================================================
    // Whole-tree scenarios
    // ========================================================================

    fn monorepo_with_children(children: &[(&str, Archetype)]) -> (ProjectTree, NodeId) {
        let mut tree = ProjectTree::new();
        let root = tree
            .add_project(ProjectSpec::new("platform", Archetype::NxMonorepo))
            .unwrap()
            .id;
        for (name, archetype) in children {
            tree.add_project(
                ProjectSpec::new(*name, *archetype)
                    .outdir(RelativePath::try_new(format!("packages/{name}")).unwrap())
                    .parent(root),
            )
            .unwrap();
        }
        (tree, root)
    }

    #[test]
    fn one_build_graph_per_tree() {
        let (tree, _) = monorepo_with_children(&[
            ("api", Archetype::CdkApp),
            ("cluster", Archetype::Cdk8sApp),
            ("charts", Archetype::Cdk8sLibrary),
        ]);
        let synthesis = tree.finalize().unwrap();

        let nx_files = synthesis
            .files()
            .filter(|(path, _)| path.ends_with("nx.json"))
            .count();
        assert_eq!(nx_files, 1);
    }

    #[test]
    fn late_contributions_reach_rendered_build_graph() {
        let (mut tree, root) = monorepo_with_children(&[("cluster", Archetype::Cdk8sApp)]);
        let cluster = tree.find_by_name("cluster").unwrap();

        tree.build_graph_mut(cluster).unwrap().set_named_input(
            "docs",
            vec!["{projectRoot}/docs/**".into()],
        );
        let synthesis = tree.finalize().unwrap();

        let doc = synthesis.projects[root.index()]
            .artifact("nx.json")
            .and_then(FileArtifact::as_json)
            .unwrap();
        assert_eq!(doc["namedInputs"]["docs"][0], "{projectRoot}/docs/**");
        assert_eq!(
            doc["targetDefaults"]["cdk8s:synth"]["outputs"][0],
            "{projectRoot}/kubernetes"
        );
    }

    #[test]
    fn scopes_added_after_construction_are_rendered() {
        let mut tree = ProjectTree::new();
        let project = tree
            .add_project(ProjectSpec::new("app", Archetype::CdkApp))
            .unwrap();
        let handle = project.placement.commit.unwrap();
        tree.component_mut::<CommitTooling>(handle)
            .unwrap()
            .append(Scope::new("infra"));

        let synthesis = tree.finalize().unwrap();
        let content = synthesis.projects[0]
            .artifact(".cz-config.js")
            .unwrap()
            .content()
            .to_string();
        let projen = content.find("\"projen\"").unwrap();
        let infra = content.find("\"infra\"").unwrap();
        assert!(projen < infra);
    }
}

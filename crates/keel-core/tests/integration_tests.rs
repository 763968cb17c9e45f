//! Integration tests for keel-core.
//!
//! These drive the public API only: build trees, place components, finalize
//! and inspect the rendered artifacts.

use keel_core::domain::{
    Archetype, CommitTooling, ComponentKind, ComponentPlacementResolver, EditorSettings,
    FileArtifact, NodeId, PlacementRequest, ProjectOptions, ProjectSpec, ProjectTree,
    RelativePath, Scope, TargetDefault, TreeManifest,
};
use keel_core::prelude::*;

fn monorepo() -> (ProjectTree, NodeId) {
    let mut tree = ProjectTree::new();
    let root = tree
        .add_project(ProjectSpec::new("platform", Archetype::NxMonorepo))
        .unwrap()
        .id;
    (tree, root)
}

fn add_child(tree: &mut ProjectTree, root: NodeId, name: &str, archetype: Archetype) -> NodeId {
    tree.add_project(
        ProjectSpec::new(name, archetype)
            .outdir(RelativePath::try_new(format!("packages/{name}")).unwrap())
            .parent(root),
    )
    .unwrap()
    .id
}

fn json(synthesis: &Synthesis, project: &str, path: &str) -> serde_json::Value {
    synthesis
        .project(project)
        .and_then(|p| p.artifact(path))
        .and_then(FileArtifact::as_json)
        .unwrap_or_else(|| panic!("{project}/{path} missing"))
}

#[test]
fn sibling_manifest_apps_share_one_synth_all_task() {
    let (mut tree, root) = monorepo();
    add_child(&mut tree, root, "web", Archetype::Cdk8sApp);
    add_child(&mut tree, root, "jobs", Archetype::Cdk8sApp);

    let count = tree[root]
        .tasks
        .iter()
        .filter(|t| t.name == "cdk8s:synth:all")
        .count();
    assert_eq!(count, 1);

    let synthesis = tree.finalize().unwrap();
    let tasks = json(&synthesis, "platform", ".projen/tasks.json");
    assert!(tasks["tasks"]["cdk8s:synth:all"].is_object());
}

#[test]
fn explicit_prettier_false_survives_resolution() {
    let mut tree = ProjectTree::new();
    let options = ProjectOptions {
        prettier: Some(false),
        ..Default::default()
    };
    tree.add_project(ProjectSpec::new("app", Archetype::CdkApp).options(options))
        .unwrap();

    let synthesis = tree.finalize().unwrap();
    let app = synthesis.project("app").unwrap();
    assert!(app.artifact(".prettierrc.json").is_none());
}

#[test]
fn subproject_editor_settings_land_on_parent() {
    let (mut tree, root) = monorepo();
    let child = add_child(&mut tree, root, "api", Archetype::CdkApp);

    let placement =
        ComponentPlacementResolver::place(&mut tree, child, PlacementRequest::default());

    assert_eq!(placement.editor.unwrap().node, root);
    assert!(placement.commit.is_none());
    assert!(!tree[child].components.contains(ComponentKind::EditorSettings));
    assert!(!tree[child].components.contains(ComponentKind::CommitTooling));
}

#[test]
fn placement_is_idempotent() {
    let mut tree = ProjectTree::new();
    let root = tree
        .add_project(ProjectSpec::new("app", Archetype::CdkApp))
        .unwrap()
        .id;

    let again = ComponentPlacementResolver::place(&mut tree, root, &ProjectOptions::default());
    assert!(!again.commit_created);
    let kinds: Vec<ComponentKind> = tree[root].components.kinds().collect();
    assert_eq!(
        kinds,
        vec![
            ComponentKind::EditorSettings,
            ComponentKind::CommitTooling,
            ComponentKind::AgentsGuide
        ]
    );

    let tooling = tree[root].component::<CommitTooling>().unwrap();
    assert_eq!(tooling.scopes().len(), 1);
    assert!(tree[root].component::<EditorSettings>().is_some());
}

#[test]
fn later_target_default_replaces_earlier() {
    let (mut tree, root) = monorepo();
    let graph = tree.build_graph_mut(root).unwrap();
    graph.set_target_default(
        "lint",
        TargetDefault {
            cache: Some(false),
            ..Default::default()
        },
    );
    graph.set_target_default(
        "lint",
        TargetDefault {
            cache: Some(true),
            ..Default::default()
        },
    );

    let synthesis = tree.finalize().unwrap();
    let nx = json(&synthesis, "platform", "nx.json");
    assert_eq!(nx["targetDefaults"]["lint"]["cache"], true);
}

#[test]
fn scopes_render_in_insertion_order() {
    let mut tree = ProjectTree::new();
    let project = tree
        .add_project(ProjectSpec::new("app", Archetype::CdkApp))
        .unwrap();
    let handle = project.placement.commit.unwrap();
    let tooling = tree.component_mut::<CommitTooling>(handle).unwrap();
    tooling.append(Scope::new("networking"));
    tooling.append(Scope::new("api"));

    let synthesis = tree.finalize().unwrap();
    let config = synthesis
        .project("app")
        .and_then(|p| p.artifact(".cz-config.js"))
        .unwrap()
        .content()
        .to_string();

    let positions: Vec<usize> = ["\"projen\"", "\"networking\"", "\"api\""]
        .iter()
        .map(|scope| config.find(scope).unwrap())
        .collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn manifest_builds_and_synthesizes_full_tree() {
    let manifest: TreeManifest = serde_json::from_value(serde_json::json!({
        "project": {
            "name": "platform",
            "archetype": "nx-monorepo",
            "options": { "default_release_branch": "trunk" }
        },
        "subprojects": [
            { "name": "cluster", "archetype": "cdk8s-app" },
            { "name": "network", "archetype": "terraform-stack", "outdir": "infra/network" }
        ]
    }))
    .unwrap();

    let synthesis = manifest.build().unwrap().finalize().unwrap();
    synthesis.validate().unwrap();

    let names: Vec<&str> = synthesis.projects.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["platform", "cluster", "network"]);

    let nx = json(&synthesis, "platform", "nx.json");
    assert_eq!(nx["affected"]["defaultBase"], "trunk");
    assert!(nx["targetDefaults"]["cdk8s:synth"].is_object());

    let paths: Vec<String> = synthesis
        .files()
        .map(|(path, _)| path.display().to_string())
        .collect();
    assert!(paths.contains(&"packages/cluster/cdk8s.yaml".to_string()));
    assert!(paths.contains(&"infra/network/.projen/tasks.json".to_string()));
    assert!(paths.contains(&".vscode/settings.json".to_string()));
    assert!(!paths.iter().any(|p| p.starts_with("packages/cluster/.vscode")));
}

#[test]
fn catalog_lists_registered_archetypes() {
    let catalog = ArchetypeCatalog::new();
    assert_eq!(catalog.list().len(), Archetype::ALL.len());
    assert_eq!(catalog.get("cdk8s-app").unwrap().flavour, "container-manifest");
}

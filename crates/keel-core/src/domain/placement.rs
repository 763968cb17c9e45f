//! Placement of singleton cross-cutting components.
//!
//! Editor settings belong to the top of a project group: a subproject's
//! settings land on its parent. Commit tooling only ever lives on a project
//! without a parent. Placement is find-or-create, so calling it repeatedly
//! for the same node leaves one instance of each component.

use tracing::debug;

use crate::domain::components::{Attached, CommitTooling, ComponentHandle, EditorSettings};
use crate::domain::options::{ProjectOptions, ResolvedOptions};
use crate::domain::tree::{NodeId, ProjectTree};

/// The two switches placement looks at. `None` means "not disabled".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlacementRequest {
    pub editor: Option<bool>,
    pub commit: Option<bool>,
}

impl From<&ResolvedOptions> for PlacementRequest {
    fn from(options: &ResolvedOptions) -> Self {
        Self {
            editor: Some(options.vscode),
            commit: Some(options.commitzent),
        }
    }
}

impl From<&ProjectOptions> for PlacementRequest {
    fn from(options: &ProjectOptions) -> Self {
        Self {
            editor: options.vscode,
            commit: options.commitzent,
        }
    }
}

/// Handles to the components placement attached (or found).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Placement {
    pub editor: Option<ComponentHandle>,
    pub commit: Option<ComponentHandle>,
    /// Whether this call created the commit tooling.
    pub commit_created: bool,
}

pub struct ComponentPlacementResolver;

impl ComponentPlacementResolver {
    /// Attach editor settings and commit tooling for `node`.
    ///
    /// Anything not explicitly disabled is placed. Editor settings go to the
    /// parent when there is one. Commit tooling is only placed on a node
    /// without a parent, whatever the request says.
    pub fn place(
        tree: &mut ProjectTree,
        node: NodeId,
        request: impl Into<PlacementRequest>,
    ) -> Placement {
        let request = request.into();
        let parent = tree.parent(node);
        let mut placement = Placement::default();

        if request.editor != Some(false) {
            let target = parent.unwrap_or(node);
            let attached = tree[target].ensure_component(|_| EditorSettings::new());
            if let Some(editor) = tree.component_mut::<EditorSettings>(attached.handle) {
                editor.apply_defaults();
            }
            debug!(
                node = %node,
                target = %target,
                created = attached.created,
                "Placed editor settings"
            );
            placement.editor = Some(attached.handle);
        }

        if request.commit != Some(false) && parent.is_none() {
            let Attached { handle, created } = tree[node].ensure_component(CommitTooling::install);
            debug!(node = %node, created, "Placed commit tooling");
            placement.commit = Some(handle);
            placement.commit_created = created;
        }

        placement
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::common::RelativePath;
    use crate::domain::components::ComponentKind;
    use crate::domain::options::{OptionsResolver, ProjectOptions, TreePosition};
    use crate::domain::value_objects::Archetype;

    fn add(
        tree: &mut ProjectTree,
        name: &str,
        parent: Option<NodeId>,
        explicit: ProjectOptions,
    ) -> NodeId {
        let position = TreePosition::from_parent(parent);
        let options = OptionsResolver::resolve(&explicit, Archetype::CdkApp, position);
        let outdir = RelativePath::try_new(name).unwrap();
        tree.add_node(name, Archetype::CdkApp, outdir, parent, options)
            .unwrap()
    }

    #[test]
    fn root_gets_editor_and_commit_tooling() {
        let mut tree = ProjectTree::new();
        let root = add(&mut tree, "root", None, ProjectOptions::default());
        let resolved = tree[root].options().clone();

        let placement = ComponentPlacementResolver::place(&mut tree, root, &resolved);

        assert_eq!(placement.editor.unwrap().node, root);
        assert_eq!(placement.commit.unwrap().node, root);
        assert!(placement.commit_created);
        assert!(tree[root].tasks.contains("commit"));
        assert!(tree[root].deps.contains("commitizen"));
    }

    #[test]
    fn placing_twice_keeps_one_instance() {
        let mut tree = ProjectTree::new();
        let root = add(&mut tree, "root", None, ProjectOptions::default());
        let resolved = tree[root].options().clone();

        let first = ComponentPlacementResolver::place(&mut tree, root, &resolved);
        let second = ComponentPlacementResolver::place(&mut tree, root, &resolved);

        assert_eq!(first.editor, second.editor);
        assert!(!second.commit_created);
        assert_eq!(tree[root].components.len(), 2);
        assert_eq!(tree[root].artifacts().len(), 1);
    }

    #[test]
    fn subproject_with_editor_enabled_places_on_parent() {
        let mut tree = ProjectTree::new();
        let root = add(
            &mut tree,
            "root",
            None,
            ProjectOptions {
                vscode: Some(false),
                commitzent: Some(false),
                ..Default::default()
            },
        );
        let sub = add(
            &mut tree,
            "sub",
            Some(root),
            ProjectOptions {
                vscode: Some(true),
                ..Default::default()
            },
        );
        let resolved = tree[sub].options().clone();

        let placement = ComponentPlacementResolver::place(&mut tree, sub, &resolved);

        assert_eq!(placement.editor.unwrap().node, root);
        assert!(tree[root].components.contains(ComponentKind::EditorSettings));
        assert!(tree[sub].components.is_empty());
    }

    #[test]
    fn subproject_never_gets_commit_tooling() {
        let mut tree = ProjectTree::new();
        let root = add(&mut tree, "root", None, ProjectOptions::default());
        let sub = add(
            &mut tree,
            "sub",
            Some(root),
            ProjectOptions {
                commitzent: Some(true),
                ..Default::default()
            },
        );
        let resolved = tree[sub].options().clone();

        let placement = ComponentPlacementResolver::place(&mut tree, sub, &resolved);

        assert!(placement.commit.is_none());
        assert!(!tree[sub].components.contains(ComponentKind::CommitTooling));
    }

    #[test]
    fn subproject_defaults_place_nothing() {
        let mut tree = ProjectTree::new();
        let root = add(&mut tree, "root", None, ProjectOptions::default());
        let sub = add(&mut tree, "sub", Some(root), ProjectOptions::default());
        let resolved = tree[sub].options().clone();

        let placement = ComponentPlacementResolver::place(&mut tree, sub, &resolved);

        assert_eq!(placement, Placement::default());
    }

    #[test]
    fn unset_editor_request_on_subproject_bubbles_to_parent() {
        let mut tree = ProjectTree::new();
        let root = add(
            &mut tree,
            "root",
            None,
            ProjectOptions {
                vscode: Some(false),
                ..Default::default()
            },
        );
        let sub = add(&mut tree, "sub", Some(root), ProjectOptions::default());

        let placement =
            ComponentPlacementResolver::place(&mut tree, sub, PlacementRequest::default());

        assert_eq!(placement.editor.unwrap().node, root);
        assert!(!tree[sub].components.contains(ComponentKind::EditorSettings));
        assert!(placement.commit.is_none());
    }
}

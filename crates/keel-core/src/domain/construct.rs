//! Archetype construction.
//!
//! Constructing a project resolves its options, inserts the node, applies the
//! archetype wiring and finally places the shared components. Everything
//! archetype-specific is keyed off the explicit [`Archetype`] tag.

use tracing::{debug, info, instrument};

use crate::domain::artifact::FileArtifact;
use crate::domain::capabilities::Flavour;
use crate::domain::common::RelativePath;
use crate::domain::components::container_manifest::{SYNTH_ALL_TASK, SYNTH_TASK};
use crate::domain::components::{
    AgentsGuide, BuildGraphRegistry, CommitTooling, ContainerManifest, LocalCluster, Scope,
};
use crate::domain::error::DomainError;
use crate::domain::options::{OptionsResolver, ProjectOptions, TreePosition};
use crate::domain::placement::{ComponentPlacementResolver, Placement};
use crate::domain::providers::render_providers;
use crate::domain::tasks::Task;
use crate::domain::tree::{NodeId, ProjectTree};
use crate::domain::value_objects::{Archetype, DependencyKind};

pub const PRETTIER_FILE: &str = ".prettierrc.json";
pub const DEFAULT_SCOPE: &str = "projen";
const CONSTRUCTS_DEPENDENCY: &str = "constructs@^10.4.2";

const RUN_MANY_TARGETS: &[(&str, &str)] = &[
    ("build", "Full release build for all affected projects"),
    ("compile", "Only compile for all affected projects"),
    ("test", "Only test for all affected projects"),
    ("eslint", "Run eslint for all affected projects"),
    ("package", "Creates the distribution package for all affected projects"),
    ("post-compile", "Run post-compile for all affected projects"),
    ("pre-compile", "Run pre-compile for all affected projects"),
];

const LIBRARY_SAMPLE: &str = "export class Hello {
  public sayHello() {
    return 'hello, world!';
  }
}
";

fn run_many(target: &str) -> String {
    format!("nx run-many --target={target} --output-style=stream --nx-bail")
}

/// What a caller asks for when adding a project.
#[derive(Debug, Clone)]
pub struct ProjectSpec {
    pub name: String,
    pub archetype: Archetype,
    pub outdir: RelativePath,
    pub parent: Option<NodeId>,
    pub options: ProjectOptions,
}

impl ProjectSpec {
    pub fn new(name: impl Into<String>, archetype: Archetype) -> Self {
        Self {
            name: name.into(),
            archetype,
            outdir: RelativePath::current(),
            parent: None,
            options: ProjectOptions::default(),
        }
    }

    pub fn outdir(mut self, outdir: RelativePath) -> Self {
        self.outdir = outdir;
        self
    }

    pub fn parent(mut self, parent: NodeId) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn options(mut self, options: ProjectOptions) -> Self {
        self.options = options;
        self
    }
}

/// A constructed project: its node and the components placement attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Project {
    pub id: NodeId,
    pub placement: Placement,
}

impl ProjectTree {
    /// Construct a project of the given archetype in this tree.
    #[instrument(skip_all, fields(project = %spec.name, archetype = %spec.archetype))]
    pub fn add_project(&mut self, spec: ProjectSpec) -> Result<Project, DomainError> {
        let position = TreePosition::from_parent(spec.parent);
        let resolved = OptionsResolver::resolve(&spec.options, spec.archetype, position);

        let id = self.add_node(&spec.name, spec.archetype, spec.outdir, spec.parent, resolved)?;
        wire_archetype(self, id)?;

        let options = self[id].options().clone();
        let placement = ComponentPlacementResolver::place(self, id, &options);
        if placement.commit_created {
            if let Some(tooling) = placement
                .commit
                .and_then(|handle| self.component_mut::<CommitTooling>(handle))
            {
                tooling.append(Scope::new(DEFAULT_SCOPE));
            }
        }

        info!(node = %id, subproject = options.subproject, "Project constructed");
        Ok(Project { id, placement })
    }
}

fn wire_archetype(tree: &mut ProjectTree, id: NodeId) -> Result<(), DomainError> {
    let archetype = tree[id].archetype();
    wire_common(tree, id)?;

    if archetype.owns_build_graph() {
        tree[id].ensure_component(BuildGraphRegistry::install);
    }

    match archetype.flavour() {
        Flavour::Monorepo => wire_monorepo(tree, id),
        Flavour::ContainerManifest => wire_container_manifest(tree, id, archetype),
        Flavour::Terraform => wire_terraform(tree, id, archetype),
        Flavour::CloudInfrastructure => {}
    }

    wire_optional_components(tree, id);
    Ok(())
}

/// Components a project opts into through its options, whatever its
/// archetype.
fn wire_optional_components(tree: &mut ProjectTree, id: NodeId) {
    let node = &mut tree[id];
    let name = node.name().to_string();
    let archetype = node.archetype();
    let options = node.options().clone();

    if options.agents {
        node.ensure_component(|_| {
            AgentsGuide::new(name.as_str(), archetype).with_custom_content(options.agents_content)
        });
    }
    if let Some(settings) = options.local_cluster {
        let attached = node.ensure_component(|setup| LocalCluster::install(setup, settings, &name));
        debug!(node = %id, created = attached.created, "Local cluster");
    }
}

fn wire_common(tree: &mut ProjectTree, id: NodeId) -> Result<(), DomainError> {
    let node = &mut tree[id];
    let archetype = node.archetype();
    let options = node.options().clone();

    for (name, description) in [
        ("pre-compile", "Prepare the project for compilation"),
        ("compile", "Only compile"),
        ("post-compile", "Runs after successful compilation"),
        ("test", "Run tests"),
    ] {
        node.tasks.add_if_absent(Task::new(name).description(description));
    }
    node.tasks.add_if_absent(
        Task::new("build")
            .description("Full release build")
            .spawn("pre-compile")
            .spawn("compile")
            .spawn("post-compile")
            .spawn("test"),
    );

    if !archetype.is_javascript() {
        return Ok(());
    }

    if options.prettier {
        node.deps.add("prettier", DependencyKind::Build);
        node.add_artifact(FileArtifact::json(PRETTIER_FILE, &options.prettier_settings)?);
    }

    node.gitignore.add("node_modules/");

    if options.eslint {
        node.deps.add("eslint", DependencyKind::Build);
        let dirs = options.eslint_options.dirs.join(" ");
        node.tasks.add_if_absent(
            Task::new("eslint")
                .description("Runs eslint against the codebase")
                .exec(format!(
                    "eslint --ext .ts,.tsx --fix --no-error-on-unmatched-pattern {dirs}"
                )),
        );
    }

    // Container-manifest projects get their samples from the component.
    if options.sample_code && archetype.flavour() != Flavour::ContainerManifest {
        let (path, content) = if archetype.def().library {
            ("src/index.ts", LIBRARY_SAMPLE)
        } else {
            ("src/main.ts", "// Entry point\n")
        };
        node.add_artifact(FileArtifact::sample(path, content));
    }

    if matches!(archetype.flavour(), Flavour::ContainerManifest) {
        node.deps.add(CONSTRUCTS_DEPENDENCY, DependencyKind::Runtime);
    }
    Ok(())
}

fn wire_monorepo(tree: &mut ProjectTree, id: NodeId) {
    let node = &mut tree[id];
    let package_manager = node.options().package_manager;
    let release_branch = node.options().default_release_branch.clone();

    for (target, description) in RUN_MANY_TARGETS {
        node.tasks.add_task(
            Task::new(*target)
                .description(*description)
                .exec(run_many(target))
                .receive_args(),
        );
    }
    node.tasks.add_task(
        Task::new("test:watch")
            .description("Only test for all affected projects")
            .exec(
                "nx run-many --target=test:watch --output-style=stream --skip-nx-cache \
                 --nx-ignore-cycles --nx-bail",
            )
            .receive_args(),
    );
    node.tasks.add_task(
        Task::new("install:ci")
            .description("Install dependencies from the lock file")
            .exec(package_manager.frozen_install())
            .exec(run_many("install:ci")),
    );
    node.tasks.add_task(
        Task::new("bump")
            .description("Bumps workspace versions from the latest release tag")
            .exec("nx release version --git-commit=false --git-tag=false"),
    );
    node.tasks.add_task(
        Task::new("unbump")
            .description("Restores workspace versions to 0.0.0")
            .exec("nx release version 0.0.0 --git-commit=false --git-tag=false"),
    );
    node.tasks.add_task(
        Task::new("release")
            .description(format!("Prepare a release from \"{release_branch}\" branch"))
            .env("RELEASE", "true")
            .exec("rm -fr dist")
            .spawn("bump")
            .spawn("build")
            .spawn("unbump")
            .exec("git diff --ignore-space-at-eol --exit-code"),
    );
    node.tasks.add_task(
        Task::new("graph")
            .description("Generate dependency graph")
            .exec("nx graph"),
    );
    node.tasks.add_task(
        Task::new("run-many")
            .description("Run task against multiple workspace projects")
            .exec("nx run-many")
            .receive_args(),
    );
    node.deps.add("@nx/workspace", DependencyKind::Build);
    node.deps.add("@nx/devkit", DependencyKind::Build);
    node.gitignore.add(".nx");
}

fn wire_container_manifest(tree: &mut ProjectTree, id: NodeId, archetype: Archetype) {
    tree[id].ensure_component(|setup| ContainerManifest::install(setup, archetype));

    let Some(component) = tree[id].component::<ContainerManifest>().cloned() else {
        return;
    };
    if !component.synthesizes() {
        return;
    }

    let root = tree.root_of(id);
    let Some(graph) = tree.build_graph_mut(id) else {
        return;
    };
    component.contribute(graph);

    let added = tree[root].tasks.add_if_absent(
        Task::new(SYNTH_ALL_TASK)
            .description("Synthesize Kubernetes manifests for all projects")
            .exec(run_many(SYNTH_TASK))
            .receive_args(),
    );
    debug!(node = %id, root = %root, added, "Shared manifest synth task");
}

fn wire_terraform(tree: &mut ProjectTree, id: NodeId, archetype: Archetype) {
    let node = &mut tree[id];
    let tasks = &mut node.tasks;

    tasks.add_task(
        Task::new("terraform")
            .description("Run terraform command with arguments")
            .exec("terraform")
            .receive_args(),
    );
    tasks.add_task(
        Task::new("terraform:format")
            .description("Format Terraform files")
            .exec("terraform fmt -recursive"),
    );
    tasks.add_task(
        Task::new("terraform:validate")
            .description("Validate Terraform configuration")
            .exec("terraform init -backend=false")
            .exec("terraform validate"),
    );
    tasks.add_task(
        Task::new("terraform:plan")
            .description("Plan Terraform changes")
            .exec("terraform plan"),
    );
    if !archetype.def().library {
        tasks.add_task(
            Task::new("terraform:apply")
                .description("Apply Terraform changes")
                .exec("terraform apply"),
        );
    }

    tasks.spawn("pre-compile", "terraform:format");
    tasks.spawn("pre-compile", "terraform:validate");
    tasks.spawn("compile", "terraform:plan");

    let version = node.options().terraform_version.clone();
    let library = archetype.def().library;
    if let Some(providers) = render_providers(&node.options().terraform_providers, !library) {
        node.add_artifact(providers);
    }
    for pattern in [".terraform/", "*.tfstate", "*.tfstate.*"] {
        node.gitignore.add(pattern);
    }

    if node.options().sample_code {
        for (file, header) in [
            ("main.tf", "# Main Terraform configuration\n"),
            ("variables.tf", "# Terraform variables\n"),
            ("outputs.tf", "# Terraform outputs\n"),
        ] {
            node.add_artifact(FileArtifact::sample(file, header));
        }
    }
    node.add_artifact(FileArtifact::text(".terraform-version", format!("{version}\n")));
}

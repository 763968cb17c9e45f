//! Build-graph metadata (`nx.json`) for a multi-project tree.
//!
//! One registry lives on the root project. Subprojects and other components
//! reach it by walking to the root (`ProjectTree::build_graph_mut`), then
//! contribute named inputs and target defaults. Every setter is
//! last-writer-wins per key; the document is rendered once at finalization.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::domain::artifact::FileArtifact;
use crate::domain::components::{Finalize, NodeSetup};
use crate::domain::error::DomainError;
use crate::domain::tasks::Task;
use crate::domain::value_objects::{DependencyKind, PackageManager};

pub const NX_FILE: &str = "nx.json";
pub const NX_SCHEMA: &str = "./node_modules/nx/schemas/nx-schema.json";

/// Structured entry of a named input set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NxInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fileset: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dependencies: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub projects: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub runtime: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub env: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_dependencies: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dependent_tasks_output_files: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transitive: Option<bool>,
}

/// One entry of a named input set: a glob/reference string or an object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum NamedInputEntry {
    Pattern(String),
    Input(NxInput),
}

impl From<&str> for NamedInputEntry {
    fn from(value: &str) -> Self {
        Self::Pattern(value.to_string())
    }
}

impl From<String> for NamedInputEntry {
    fn from(value: String) -> Self {
        Self::Pattern(value)
    }
}

impl From<NxInput> for NamedInputEntry {
    fn from(value: NxInput) -> Self {
        Self::Input(value)
    }
}

/// Per-target defaults. Absent fields are omitted from the document.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetDefault {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub executor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Map<String, Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outputs: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_configuration: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub configurations: Option<Map<String, Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub continuous: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parallelism: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inputs: Option<Vec<NamedInputEntry>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub depends_on: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sync_generators: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskRunner {
    pub runner: String,
    pub options: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
struct Affected {
    default_base: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BuildGraphRegistry {
    named_inputs: BTreeMap<String, Vec<NamedInputEntry>>,
    target_defaults: BTreeMap<String, TargetDefault>,
    task_runners: BTreeMap<String, TaskRunner>,
    affected_default_base: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct NxDocument<'a> {
    #[serde(rename = "$schema")]
    schema: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    affected: Option<Affected>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    named_inputs: &'a BTreeMap<String, Vec<NamedInputEntry>>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    target_defaults: &'a BTreeMap<String, TargetDefault>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    tasks_runner_options: &'a BTreeMap<String, TaskRunner>,
}

fn patterns(items: &[&str]) -> Vec<NamedInputEntry> {
    items.iter().map(|s| NamedInputEntry::from(*s)).collect()
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl BuildGraphRegistry {
    /// An empty registry with no seeded entries.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create the registry for a monorepo root, registering the `nx`
    /// dependency and task and seeding the standard inputs and targets.
    pub fn install(setup: &mut NodeSetup<'_>) -> Self {
        let options = setup.options;
        setup
            .deps
            .add(&format!("nx@^{}", options.nx_version.major()), DependencyKind::Devenv);
        setup.tasks.add_task(
            Task::new("nx")
                .description("Run nx commands")
                .say("Running nx commands")
                .exec("nx")
                .receive_args()
                .locked(),
        );

        let mut registry = Self::new();
        registry.seed(options.package_manager);
        registry.set_affected_default_base(options.default_release_branch.clone());
        registry
    }

    fn seed(&mut self, package_manager: PackageManager) {
        self.set_named_input("default", patterns(&["{projectRoot}/**/*", "sharedGlobals"]));
        self.set_named_input(
            "production",
            patterns(&[
                "default",
                "!{projectRoot}/**/*.spec.ts",
                "!{projectRoot}/**/*.test.ts",
                "!{projectRoot}/**/*.snap",
                "!{projectRoot}/test/**",
                "!{projectRoot}/tests/**",
                "!{projectRoot}/**/*.md",
            ]),
        );
        self.set_named_input("test", patterns(&["default"]));
        self.set_named_input(
            "sharedGlobals",
            vec![
                "{workspaceRoot}/nx.json".into(),
                "{workspaceRoot}/tsconfig.dev.json".into(),
                "{workspaceRoot}/package.json".into(),
                format!("{{workspaceRoot}}/{}", package_manager.lock_file()).into(),
                "{workspaceRoot}/.projenrc.ts".into(),
            ],
        );

        self.set_target_default(
            "build",
            TargetDefault {
                depends_on: Some(strings(&["^build"])),
                inputs: Some(patterns(&["production", "^production"])),
                cache: Some(true),
                ..Default::default()
            },
        );
        self.set_target_default(
            "test",
            TargetDefault {
                inputs: Some(patterns(&["default", "^production"])),
                cache: Some(true),
                ..Default::default()
            },
        );

        let mut runner_options = Map::new();
        runner_options.insert(
            "cacheableOperations".to_string(),
            Value::from(strings(&["build", "test"])),
        );
        self.set_task_runner(
            "default",
            TaskRunner {
                runner: "nx/tasks-runners/default".to_string(),
                options: runner_options,
            },
        );
    }

    /// Replace the entries of a named input set.
    pub fn set_named_input(&mut self, name: impl Into<String>, entries: Vec<NamedInputEntry>) {
        let name = name.into();
        debug!(named_input = %name, entries = entries.len(), "Setting named input");
        self.named_inputs.insert(name, entries);
    }

    /// Replace the defaults of one target.
    pub fn set_target_default(&mut self, name: impl Into<String>, target: TargetDefault) {
        let name = name.into();
        debug!(target = %name, "Setting target default");
        self.target_defaults.insert(name, target);
    }

    pub fn set_task_runner(&mut self, name: impl Into<String>, runner: TaskRunner) {
        self.task_runners.insert(name.into(), runner);
    }

    pub fn set_affected_default_base(&mut self, branch: impl Into<String>) {
        self.affected_default_base = Some(branch.into());
    }

    pub fn named_input(&self, name: &str) -> Option<&[NamedInputEntry]> {
        self.named_inputs.get(name).map(Vec::as_slice)
    }

    pub fn target_default(&self, name: &str) -> Option<&TargetDefault> {
        self.target_defaults.get(name)
    }

    pub fn task_runner(&self, name: &str) -> Option<&TaskRunner> {
        self.task_runners.get(name)
    }

    fn document(&self) -> NxDocument<'_> {
        NxDocument {
            schema: NX_SCHEMA,
            affected: self
                .affected_default_base
                .clone()
                .map(|default_base| Affected { default_base }),
            named_inputs: &self.named_inputs,
            target_defaults: &self.target_defaults,
            tasks_runner_options: &self.task_runners,
        }
    }
}

impl Finalize for BuildGraphRegistry {
    fn render(&self) -> Result<Vec<FileArtifact>, DomainError> {
        Ok(vec![FileArtifact::json(NX_FILE, &self.document())?])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn render_json(registry: &BuildGraphRegistry) -> Value {
        registry.render().unwrap()[0].as_json().unwrap()
    }

    #[test]
    fn empty_registry_renders_schema_only() {
        let doc = render_json(&BuildGraphRegistry::new());
        assert_eq!(doc, json!({ "$schema": NX_SCHEMA }));
    }

    #[test]
    fn last_writer_wins_per_key() {
        let mut registry = BuildGraphRegistry::new();
        registry.set_named_input("manifests", patterns(&["{projectRoot}/a/**"]));
        registry.set_named_input("manifests", patterns(&["{projectRoot}/b/**"]));
        registry.set_target_default(
            "lint",
            TargetDefault {
                cache: Some(false),
                ..Default::default()
            },
        );
        registry.set_target_default(
            "lint",
            TargetDefault {
                cache: Some(true),
                ..Default::default()
            },
        );

        let doc = render_json(&registry);
        assert_eq!(doc["namedInputs"]["manifests"], json!(["{projectRoot}/b/**"]));
        assert_eq!(doc["targetDefaults"]["lint"], json!({ "cache": true }));
    }

    #[test]
    fn structured_inputs_render_as_objects() {
        let mut registry = BuildGraphRegistry::new();
        registry.set_named_input(
            "ci",
            vec![
                "default".into(),
                NxInput {
                    env: Some("CI".into()),
                    ..Default::default()
                }
                .into(),
                NxInput {
                    external_dependencies: Some(vec!["typescript".into()]),
                    ..Default::default()
                }
                .into(),
            ],
        );
        let doc = render_json(&registry);
        assert_eq!(
            doc["namedInputs"]["ci"],
            json!(["default", { "env": "CI" }, { "externalDependencies": ["typescript"] }])
        );
    }

    #[test]
    fn seeded_registry_lists_lock_file_and_targets() {
        let mut registry = BuildGraphRegistry::new();
        registry.seed(PackageManager::Npm);
        let doc = render_json(&registry);

        assert!(
            doc["namedInputs"]["sharedGlobals"]
                .as_array()
                .unwrap()
                .contains(&json!("{workspaceRoot}/package-lock.json"))
        );
        assert_eq!(
            doc["targetDefaults"]["build"],
            json!({
                "inputs": ["production", "^production"],
                "dependsOn": ["^build"],
                "cache": true
            })
        );
        assert_eq!(
            doc["tasksRunnerOptions"]["default"]["runner"],
            json!("nx/tasks-runners/default")
        );
    }

    #[test]
    fn affected_base_renders_when_set() {
        let mut registry = BuildGraphRegistry::new();
        registry.set_affected_default_base("develop");
        assert_eq!(render_json(&registry)["affected"], json!({ "defaultBase": "develop" }));
    }
}

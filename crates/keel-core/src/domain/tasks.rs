//! Per-project task and dependency registries.
//!
//! Both registries are plain ordered maps owned by a `ProjectNode`. They are
//! rendered into `.projen/tasks.json` and `.projen/deps.json` when the tree
//! is finalized.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::debug;

use crate::domain::artifact::FileArtifact;
use crate::domain::error::DomainError;
use crate::domain::value_objects::DependencyKind;

pub const TASKS_FILE: &str = ".projen/tasks.json";
pub const DEPS_FILE: &str = ".projen/deps.json";

// ── Tasks ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StepAction {
    Exec(String),
    Spawn(String),
    Say(String),
}

/// One step of a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskStep {
    #[serde(flatten)]
    pub action: StepAction,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub receive_args: bool,
}

/// A named, ordered list of steps.
///
/// A locked task can no longer be replaced through [`TaskRegistry::add_task`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub env: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub steps: Vec<TaskStep>,
    #[serde(skip)]
    pub locked: bool,
}

impl Task {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            env: BTreeMap::new(),
            steps: Vec::new(),
            locked: false,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn exec(mut self, command: impl Into<String>) -> Self {
        self.push(StepAction::Exec(command.into()));
        self
    }

    pub fn spawn(mut self, task: impl Into<String>) -> Self {
        self.push(StepAction::Spawn(task.into()));
        self
    }

    pub fn say(mut self, message: impl Into<String>) -> Self {
        self.push(StepAction::Say(message.into()));
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    /// Forward extra CLI arguments to the most recent step.
    pub fn receive_args(mut self) -> Self {
        if let Some(step) = self.steps.last_mut() {
            step.receive_args = true;
        }
        self
    }

    pub fn locked(mut self) -> Self {
        self.locked = true;
        self
    }

    fn push(&mut self, action: StepAction) {
        self.steps.push(TaskStep {
            action,
            receive_args: false,
        });
    }

    /// Names of the tasks this one spawns, in step order.
    pub fn spawned(&self) -> impl Iterator<Item = &str> {
        self.steps.iter().filter_map(|s| match &s.action {
            StepAction::Spawn(name) => Some(name.as_str()),
            _ => None,
        })
    }
}

/// Outcome of [`TaskRegistry::add_task`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskInsert {
    Added,
    Replaced,
    /// The existing task is locked; nothing changed.
    Kept,
}

#[derive(Debug, Clone, Default)]
pub struct TaskRegistry {
    tasks: BTreeMap<String, Task>,
}

#[derive(Serialize)]
struct TasksDocument<'a> {
    tasks: &'a BTreeMap<String, Task>,
}

impl TaskRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a task. A locked task of the same name wins; an unlocked one
    /// is replaced.
    pub fn add_task(&mut self, task: Task) -> TaskInsert {
        match self.tasks.get(&task.name) {
            Some(existing) if existing.locked => {
                debug!(task = %task.name, "Task is locked, keeping existing definition");
                TaskInsert::Kept
            }
            Some(_) => {
                debug!(task = %task.name, "Replacing task");
                self.tasks.insert(task.name.clone(), task);
                TaskInsert::Replaced
            }
            None => {
                self.tasks.insert(task.name.clone(), task);
                TaskInsert::Added
            }
        }
    }

    /// Register a task only when no task of that name exists.
    pub fn add_if_absent(&mut self, task: Task) -> bool {
        if self.tasks.contains_key(&task.name) {
            return false;
        }
        self.tasks.insert(task.name.clone(), task);
        true
    }

    /// Append a spawn step for `child` to `parent`. Returns false when either
    /// task is missing.
    pub fn spawn(&mut self, parent: &str, child: &str) -> bool {
        if !self.tasks.contains_key(child) {
            return false;
        }
        match self.tasks.get_mut(parent) {
            Some(task) => {
                task.push(StepAction::Spawn(child.to_string()));
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tasks.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&Task> {
        self.tasks.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Task> {
        self.tasks.values()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn render(&self) -> Result<FileArtifact, DomainError> {
        FileArtifact::json(TASKS_FILE, &TasksDocument { tasks: &self.tasks })
    }
}

// ── Dependencies ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dependency {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(rename = "type")]
    pub kind: DependencyKind,
}

impl Dependency {
    /// Parse `name` or `name@version`. Scoped names (`@scope/pkg@1`) keep
    /// their leading `@`.
    pub fn parse(spec: &str, kind: DependencyKind) -> Self {
        let spec = spec.trim();
        let split_at = spec
            .char_indices()
            .skip(1)
            .find(|&(_, c)| c == '@')
            .map(|(i, _)| i);

        let (name, version) = match split_at {
            Some(i) => (&spec[..i], Some(&spec[i + 1..])),
            None => (spec, None),
        };

        Self {
            name: name.to_string(),
            version: version.filter(|v| !v.is_empty()).map(str::to_string),
            kind,
        }
    }
}

/// Dependencies keyed by `(name, kind)`.
#[derive(Debug, Clone, Default)]
pub struct DependencySet {
    deps: BTreeMap<(String, DependencyKind), Dependency>,
}

#[derive(Serialize)]
struct DepsDocument<'a> {
    dependencies: Vec<&'a Dependency>,
}

impl DependencySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `name[@version]`. Re-adding keeps the entry and updates the
    /// version if a new one is given.
    pub fn add(&mut self, spec: &str, kind: DependencyKind) {
        let dep = Dependency::parse(spec, kind);
        let key = (dep.name.clone(), kind);
        match self.deps.get_mut(&key) {
            Some(existing) => {
                if dep.version.is_some() {
                    existing.version = dep.version;
                }
            }
            None => {
                self.deps.insert(key, dep);
            }
        }
    }

    pub fn get(&self, name: &str, kind: DependencyKind) -> Option<&Dependency> {
        self.deps.get(&(name.to_string(), kind))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.deps.keys().any(|(n, _)| n == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Dependency> {
        self.deps.values()
    }

    pub fn len(&self) -> usize {
        self.deps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.deps.is_empty()
    }

    pub fn render(&self) -> Result<FileArtifact, DomainError> {
        FileArtifact::json(
            DEPS_FILE,
            &DepsDocument {
                dependencies: self.deps.values().collect(),
            },
        )
    }
}

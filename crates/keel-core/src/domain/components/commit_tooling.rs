//! Conventional-commit tooling (commitizen with cz-customizable).
//!
//! The component owns the ordered scope list. Scopes are appended from any
//! number of call sites during construction and rendered once into
//! `.cz-config.js`.

use serde::Serialize;

use crate::domain::artifact::FileArtifact;
use crate::domain::components::{Finalize, NodeSetup};
use crate::domain::error::DomainError;
use crate::domain::tasks::Task;
use crate::domain::value_objects::DependencyKind;

pub const CONFIG_FILE: &str = ".cz-config.js";
pub const RC_FILE: &str = ".czrc";

/// A commit scope offered by the prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Scope {
    pub name: String,
}

impl Scope {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct CommitType {
    pub value: &'static str,
    pub name: &'static str,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptMessages {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub scope: &'static str,
    pub custom_scope: &'static str,
    pub subject: &'static str,
    pub body: &'static str,
    pub breaking: &'static str,
    pub footer: &'static str,
    pub confirm_commit: &'static str,
}

/// Fixed part of the rendered configuration.
#[derive(Debug, Clone, Copy)]
pub struct CommitConfig {
    pub types: &'static [CommitType],
    pub messages: PromptMessages,
    pub use_prepared_commit: bool,
    pub allow_ticket_number: bool,
    pub is_ticket_number_required: bool,
    pub ticket_number_prefix: &'static str,
    pub ticket_number_reg_exp: &'static str,
    pub allow_custom_scopes: bool,
    pub allow_breaking_changes: &'static [&'static str],
    pub subject_limit: u32,
}

pub static DEFAULT_COMMIT_CONFIG: CommitConfig = CommitConfig {
    types: &[
        CommitType { value: "feat", name: "feat:     A new feature" },
        CommitType { value: "fix", name: "fix:      A bug fix" },
        CommitType { value: "docs", name: "docs:     Documentation only changes" },
        CommitType {
            value: "style",
            name: concat!(
                "style:    Changes that do not affect the meaning of the code\n",
                "            (white-space, formatting, missing semi-colons, etc)",
            ),
        },
        CommitType {
            value: "refactor",
            name: "refactor: A code change that neither fixes a bug nor adds a feature",
        },
        CommitType { value: "perf", name: "perf:     A code change that improves performance" },
        CommitType { value: "test", name: "test:     Adding missing tests" },
        CommitType {
            value: "chore",
            name: concat!(
                "chore:    Changes to the build process or auxiliary tools\n",
                "            and libraries such as documentation generation",
            ),
        },
        CommitType { value: "revert", name: "revert:   Revert to a commit" },
        CommitType { value: "WIP", name: "WIP:      Work in progress" },
    ],
    messages: PromptMessages {
        kind: "Select the type of change that you're committing:",
        scope: "\nDenote the SCOPE of this change (optional):",
        custom_scope: "Denote the SCOPE of this change:",
        subject: "Write a SHORT, IMPERATIVE tense description of the change:\n",
        body: concat!(
            "Provide a LONGER description of the change (optional). ",
            "Use \"|\" to break new line:\n",
        ),
        breaking: "List any BREAKING CHANGES (optional):\n",
        footer: "List any ISSUES CLOSED by this change (optional). E.g.: #31, #34:\n",
        confirm_commit: "Are you sure you want to proceed with the commit above?",
    },
    use_prepared_commit: true,
    allow_ticket_number: false,
    is_ticket_number_required: false,
    ticket_number_prefix: "TICKET-",
    ticket_number_reg_exp: "\\d{1,5}",
    allow_custom_scopes: true,
    allow_breaking_changes: &["feat", "fix"],
    subject_limit: 100,
};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ConfigDocument<'a> {
    types: &'a [CommitType],
    scopes: &'a [Scope],
    use_prepared_commit: bool,
    allow_ticket_number: bool,
    is_ticket_number_required: bool,
    ticket_number_prefix: &'a str,
    ticket_number_reg_exp: &'a str,
    messages: &'a PromptMessages,
    allow_custom_scopes: bool,
    allow_breaking_changes: &'a [&'a str],
    subject_limit: u32,
}

/// Commit tooling component with its scope accumulator.
#[derive(Debug, Clone)]
pub struct CommitTooling {
    config: &'static CommitConfig,
    scopes: Vec<Scope>,
}

impl Default for CommitTooling {
    fn default() -> Self {
        Self::new()
    }
}

impl CommitTooling {
    pub fn new() -> Self {
        Self {
            config: &DEFAULT_COMMIT_CONFIG,
            scopes: Vec::new(),
        }
    }

    /// Create the component and register what it needs on its node.
    pub fn install(setup: &mut NodeSetup<'_>) -> Self {
        setup.deps.add("commitizen", DependencyKind::Build);
        setup.deps.add("cz-customizable", DependencyKind::Build);
        setup.tasks.add_task(
            Task::new("commit")
                .description(
                    "Commit changes with conventional commits prompts provided by Commitizen",
                )
                .say("committing changes")
                .exec("./node_modules/cz-customizable/standalone.js")
                .locked(),
        );
        setup.artifacts.push(FileArtifact::text(
            RC_FILE,
            "{\n  \"path\": \"node_modules/cz-customizable\"\n}\n",
        ));
        Self::new()
    }

    /// Append a scope. Order is kept and duplicates are not removed.
    pub fn append(&mut self, scope: Scope) {
        self.scopes.push(scope);
    }

    pub fn scopes(&self) -> &[Scope] {
        &self.scopes
    }

    fn document(&self) -> ConfigDocument<'_> {
        let c = self.config;
        ConfigDocument {
            types: c.types,
            scopes: &self.scopes,
            use_prepared_commit: c.use_prepared_commit,
            allow_ticket_number: c.allow_ticket_number,
            is_ticket_number_required: c.is_ticket_number_required,
            ticket_number_prefix: c.ticket_number_prefix,
            ticket_number_reg_exp: c.ticket_number_reg_exp,
            messages: &c.messages,
            allow_custom_scopes: c.allow_custom_scopes,
            allow_breaking_changes: c.allow_breaking_changes,
            subject_limit: c.subject_limit,
        }
    }
}

impl Finalize for CommitTooling {
    fn render(&self) -> Result<Vec<FileArtifact>, DomainError> {
        let body = serde_json::to_string_pretty(&self.document()).map_err(|e| {
            DomainError::Serialization {
                artifact: CONFIG_FILE.to_string(),
                reason: e.to_string(),
            }
        })?;
        Ok(vec![FileArtifact::script(
            CONFIG_FILE,
            format!("module.exports = {body};\n"),
        )])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rendered_scopes(tooling: &CommitTooling) -> Vec<String> {
        let artifact = tooling.render().unwrap().remove(0);
        let content = artifact.content();
        let start = content.find('{').unwrap();
        let end = content.rfind('}').unwrap();
        let doc: serde_json::Value = serde_json::from_str(&content[start..=end]).unwrap();
        doc["scopes"]
            .as_array()
            .unwrap()
            .iter()
            .map(|s| s["name"].as_str().unwrap().to_string())
            .collect()
    }

    #[test]
    fn scopes_render_in_append_order() {
        let mut tooling = CommitTooling::new();
        tooling.append(Scope::new("s1"));
        tooling.append(Scope::new("s2"));
        assert_eq!(rendered_scopes(&tooling), vec!["s1", "s2"]);
    }

    #[test]
    fn duplicate_scopes_are_kept() {
        let mut tooling = CommitTooling::new();
        tooling.append(Scope::new("api"));
        tooling.append(Scope::new("api"));
        assert_eq!(rendered_scopes(&tooling), vec!["api", "api"]);
    }

    #[test]
    fn render_is_repeatable() {
        let mut tooling = CommitTooling::new();
        tooling.append(Scope::new("projen"));
        assert_eq!(tooling.render().unwrap(), tooling.render().unwrap());
    }

    #[test]
    fn rendered_module_carries_static_config() {
        let artifact = CommitTooling::new().render().unwrap().remove(0);
        let content = artifact.content();
        assert!(content.contains("module.exports = {"));
        assert!(content.contains("\"subjectLimit\": 100"));
        assert!(content.contains("\"ticketNumberPrefix\": \"TICKET-\""));
        assert!(content.contains("\"allowBreakingChanges\": [\n    \"feat\",\n    \"fix\"\n  ]"));
        assert!(content.trim_end().ends_with("};"));
    }
}

//! VS Code workspace settings shared by a project and its subprojects.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{Value, json};

use crate::domain::artifact::FileArtifact;
use crate::domain::components::Finalize;
use crate::domain::error::DomainError;

pub const SETTINGS_FILE: &str = ".vscode/settings.json";
pub const EXTENSIONS_FILE: &str = ".vscode/extensions.json";

const RECOMMENDED_EXTENSIONS: &[&str] = &["dbaeumer.vscode-eslint", "esbenp.prettier-vscode"];

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EditorSettings {
    settings: BTreeMap<String, Value>,
    recommendations: Vec<String>,
}

#[derive(Serialize)]
struct ExtensionsDocument<'a> {
    recommendations: &'a [String],
}

impl EditorSettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply the formatter/linter integration every placement installs.
    ///
    /// Applying it again leaves the settings unchanged.
    pub fn apply_defaults(&mut self) {
        self.add_setting("editor.formatOnSave", json!(true));
        self.add_setting("editor.defaultFormatter", json!("esbenp.prettier-vscode"));
        self.add_setting(
            "editor.codeActionsOnSave",
            json!({ "source.fixAll.eslint": "explicit" }),
        );
        self.add_setting("eslint.workingDirectories", json!([{ "mode": "auto" }]));
        self.add_setting("typescript.tsdk", json!("node_modules/typescript/lib"));

        for extension in RECOMMENDED_EXTENSIONS {
            self.add_recommendation(*extension);
        }
    }

    pub fn add_setting(&mut self, key: impl Into<String>, value: Value) {
        self.settings.insert(key.into(), value);
    }

    pub fn add_recommendation(&mut self, extension: impl Into<String>) {
        let extension = extension.into();
        if !self.recommendations.contains(&extension) {
            self.recommendations.push(extension);
        }
    }

    pub fn setting(&self, key: &str) -> Option<&Value> {
        self.settings.get(key)
    }

    pub fn recommendations(&self) -> &[String] {
        &self.recommendations
    }
}

impl Finalize for EditorSettings {
    fn render(&self) -> Result<Vec<FileArtifact>, DomainError> {
        let mut artifacts = vec![FileArtifact::json(SETTINGS_FILE, &self.settings)?];
        if !self.recommendations.is_empty() {
            artifacts.push(FileArtifact::json(
                EXTENSIONS_FILE,
                &ExtensionsDocument {
                    recommendations: &self.recommendations,
                },
            )?);
        }
        Ok(artifacts)
    }
}

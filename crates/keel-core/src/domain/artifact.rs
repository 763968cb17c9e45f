//! Generated file artifacts.
//!
//! A [`FileArtifact`] is the unit of output: a path relative to the owning
//! project's directory plus fully rendered content. Nothing here touches the
//! filesystem; artifacts are handed to the `Filesystem` port by the synthesis
//! service.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::domain::error::DomainError;

/// First line of every generated script artifact.
pub const GENERATED_MARKER: &str =
    "~~ Generated by keel. To modify, edit keel.toml and run \"keel synth\".";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactFormat {
    Json,
    Yaml,
    Text,
    Script,
}

impl ArtifactFormat {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Yaml => "yaml",
            Self::Text => "text",
            Self::Script => "script",
        }
    }
}

/// A rendered file, not yet written.
///
/// The path is validated when the owning tree is synthesized, not here, so
/// constructors stay infallible for plain text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileArtifact {
    path: PathBuf,
    format: ArtifactFormat,
    content: String,
    sample: bool,
}

impl FileArtifact {
    /// Pretty-printed JSON followed by a newline.
    pub fn json(path: impl Into<PathBuf>, value: &impl Serialize) -> Result<Self, DomainError> {
        let path = path.into();
        let mut content =
            serde_json::to_string_pretty(value).map_err(|e| serialization_error(&path, e))?;
        content.push('\n');
        Ok(Self::new(path, ArtifactFormat::Json, content))
    }

    pub fn yaml(path: impl Into<PathBuf>, value: &impl Serialize) -> Result<Self, DomainError> {
        let path = path.into();
        let content = serde_yaml::to_string(value).map_err(|e| serialization_error(&path, e))?;
        Ok(Self::new(path, ArtifactFormat::Yaml, content))
    }

    pub fn text(path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        Self::new(path.into(), ArtifactFormat::Text, content.into())
    }

    /// JavaScript module prefixed with the generated-file marker.
    pub fn script(path: impl Into<PathBuf>, body: impl AsRef<str>) -> Self {
        let content = format!("// {GENERATED_MARKER}\n\n{}", body.as_ref());
        Self::new(path.into(), ArtifactFormat::Script, content)
    }

    /// Starter file written only when nothing exists at the path yet.
    pub fn sample(path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        Self {
            sample: true,
            ..Self::text(path, content)
        }
    }

    fn new(path: PathBuf, format: ArtifactFormat, content: String) -> Self {
        Self {
            path,
            format,
            content,
            sample: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn format(&self) -> ArtifactFormat {
        self.format
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn is_sample(&self) -> bool {
        self.sample
    }

    /// Parse JSON content back into a value. Used by callers that inspect
    /// rendered documents.
    pub fn as_json(&self) -> Option<serde_json::Value> {
        match self.format {
            ArtifactFormat::Json => serde_json::from_str(&self.content).ok(),
            _ => None,
        }
    }
}

pub const GITIGNORE_FILE: &str = ".gitignore";

/// Ordered, duplicate-free `.gitignore` patterns for one project.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IgnoreFile {
    patterns: Vec<String>,
}

impl IgnoreFile {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false when the pattern was already present.
    pub fn add(&mut self, pattern: impl Into<String>) -> bool {
        let pattern = pattern.into();
        if self.patterns.contains(&pattern) {
            return false;
        }
        self.patterns.push(pattern);
        true
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn render(&self) -> FileArtifact {
        let mut content = format!("# {GENERATED_MARKER}\n");
        for pattern in &self.patterns {
            content.push_str(pattern);
            content.push('\n');
        }
        FileArtifact::text(GITIGNORE_FILE, content)
    }
}

fn serialization_error(path: &Path, err: impl std::fmt::Display) -> DomainError {
    DomainError::Serialization {
        artifact: path.display().to_string(),
        reason: err.to_string(),
    }
}

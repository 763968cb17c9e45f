//! TOML manifest loader.
//!
//! Reads a `keel.toml` describing one root project and its subprojects and
//! turns it into a [`TreeManifest`] ready to build.
//!
//! # `keel.toml` format
//!
//! ```toml
//! [project]
//! name      = "platform"
//! archetype = "nx-monorepo"
//!
//! [project.options]
//! default_release_branch = "main"
//!
//! [[subprojects]]
//! name      = "cluster"
//! archetype = "cdk8s-app"
//! outdir    = "packages/cluster"   # optional; defaults to packages/<name>
//! parent    = "platform"           # optional; defaults to the root
//!
//! [subprojects.options]
//! k8s_version = "1.30.0"
//! ```

use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use tracing::{debug, instrument};

use keel_core::{
    application::ApplicationError,
    domain::TreeManifest,
    error::KeelResult,
};

/// File name looked up when no manifest path is given.
pub const DEFAULT_MANIFEST: &str = "keel.toml";

pub struct ManifestLoader {
    path: PathBuf,
}

impl ManifestLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read, parse and validate the manifest.
    ///
    /// # Errors
    ///
    /// - [`ApplicationError::ManifestNotFound`] if the file does not exist.
    /// - [`ApplicationError::ManifestLoad`] if it cannot be read or parsed.
    /// - A domain error if names, archetypes or parents are invalid.
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub fn load(&self) -> KeelResult<TreeManifest> {
        let raw = fs::read_to_string(&self.path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => ApplicationError::ManifestNotFound {
                path: self.path.clone(),
            },
            _ => ApplicationError::ManifestLoad {
                path: self.path.clone(),
                reason: e.to_string(),
            },
        })?;

        let manifest = self.parse(&raw)?;
        debug!(
            root = %manifest.project.name,
            subprojects = manifest.subprojects.len(),
            "loaded manifest"
        );
        Ok(manifest)
    }

    /// Parse manifest text as if it came from this loader's path.
    pub fn parse(&self, raw: &str) -> KeelResult<TreeManifest> {
        let manifest: TreeManifest =
            toml::from_str(raw).map_err(|e| ApplicationError::ManifestLoad {
                path: self.path.clone(),
                reason: e.to_string(),
            })?;
        manifest.validate()?;
        Ok(manifest)
    }
}

/// Render a manifest back to TOML, as written by `keel init`.
pub fn to_toml(manifest: &TreeManifest) -> KeelResult<String> {
    toml::to_string_pretty(manifest).map_err(|e| {
        ApplicationError::ValidationFailed(format!("cannot serialize manifest: {e}")).into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use keel_core::domain::{DomainError, ManifestProject, ProjectOptions};
    use keel_core::error::KeelError;
    use tempfile::TempDir;

    const NESTED: &str = r#"
[project]
name = "platform"
archetype = "nx-monorepo"

[project.options]
default_release_branch = "trunk"
package_manager = "pnpm"

[[subprojects]]
name = "cluster"
archetype = "cdk8s-app"

[subprojects.options]
k8s_version = "1.30.0"
cdk8s_imports = ["github:crossplane/crossplane@0.14.0"]

[[subprojects]]
name = "network"
archetype = "terraform"
outdir = "infra/network"
"#;

    fn write_manifest(content: &str) -> (TempDir, PathBuf) {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(DEFAULT_MANIFEST);
        fs::write(&path, content).unwrap();
        (temp, path)
    }

    #[test]
    fn loads_nested_manifest() {
        let (_temp, path) = write_manifest(NESTED);
        let manifest = ManifestLoader::new(&path).load().unwrap();

        assert_eq!(manifest.project.name, "platform");
        assert_eq!(manifest.subprojects.len(), 2);
        assert_eq!(manifest.subprojects[0].options.cdk8s_imports.len(), 1);
        assert_eq!(
            manifest.subprojects[1].outdir.as_deref(),
            Some("infra/network")
        );

        let tree = manifest.build().unwrap();
        assert_eq!(tree.len(), 3);
    }

    #[test]
    fn missing_file_is_not_found() {
        let temp = TempDir::new().unwrap();
        let err = ManifestLoader::new(temp.path().join("nope.toml"))
            .load()
            .unwrap_err();
        assert!(matches!(
            err,
            KeelError::Application(ApplicationError::ManifestNotFound { .. })
        ));
    }

    #[test]
    fn unknown_option_is_a_load_error() {
        let loader = ManifestLoader::new(DEFAULT_MANIFEST);
        let err = loader
            .parse(concat!(
                "[project]\nname = \"a\"\narchetype = \"cdk-app\"\n",
                "[project.options]\nprettierr = true\n",
            ))
            .unwrap_err();
        assert!(matches!(
            err,
            KeelError::Application(ApplicationError::ManifestLoad { .. })
        ));
    }

    #[test]
    fn unknown_archetype_surfaces_domain_error() {
        let loader = ManifestLoader::new(DEFAULT_MANIFEST);
        let err = loader
            .parse("[project]\nname = \"a\"\narchetype = \"helm-chart\"\n")
            .unwrap_err();
        assert!(matches!(
            err,
            KeelError::Domain(DomainError::UnknownArchetype { .. })
        ));
    }

    #[test]
    fn rendered_manifest_parses_back() {
        let manifest = TreeManifest {
            project: ManifestProject {
                name: "app".into(),
                archetype: "cdk-app".into(),
                outdir: None,
                parent: None,
                options: ProjectOptions {
                    prettier: Some(false),
                    ..Default::default()
                },
            },
            subprojects: vec![],
        };
        let text = to_toml(&manifest).unwrap();
        let parsed = ManifestLoader::new(DEFAULT_MANIFEST).parse(&text).unwrap();
        assert_eq!(parsed, manifest);
    }
}

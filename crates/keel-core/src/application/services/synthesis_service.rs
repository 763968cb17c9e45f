//! Synthesis Service - main application orchestrator.
//!
//! This service coordinates a synthesis run:
//! 1. Run preflight checks (fail-fast)
//! 2. Finalize the project tree
//! 3. Validate the rendered artifacts
//! 4. Write through the filesystem port
//!
//! Steps 1-3 complete before the first byte is written.

use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

use crate::{
    application::{
        ApplicationError,
        ports::{Filesystem, Preflight},
    },
    domain::{ProjectTree, Synthesis},
    error::KeelResult,
};

/// Summary of a completed run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SynthesisReport {
    pub projects: usize,
    pub written: Vec<PathBuf>,
    /// Sample files left alone because something already exists there.
    pub skipped: Vec<PathBuf>,
}

pub struct SynthesisService {
    filesystem: Box<dyn Filesystem>,
    preflight: Vec<Box<dyn Preflight>>,
}

impl SynthesisService {
    /// Create a new synthesis service writing through `filesystem`.
    pub fn new(filesystem: Box<dyn Filesystem>) -> Self {
        Self {
            filesystem,
            preflight: Vec::new(),
        }
    }

    /// Add a check that must pass before synthesis writes anything.
    pub fn with_preflight(mut self, check: Box<dyn Preflight>) -> Self {
        self.preflight.push(check);
        self
    }

    /// Finalize `tree` and write every artifact under `outdir`.
    #[instrument(skip_all, fields(outdir = %outdir.as_ref().display()))]
    pub fn synthesize(
        &self,
        tree: ProjectTree,
        outdir: impl AsRef<Path>,
    ) -> KeelResult<SynthesisReport> {
        let outdir = outdir.as_ref();

        self.run_preflight()?;
        let synthesis = self.plan(tree)?;

        let report = self.write_all(&synthesis, outdir)?;
        info!(
            projects = report.projects,
            written = report.written.len(),
            skipped = report.skipped.len(),
            "Synthesis completed successfully"
        );
        Ok(report)
    }

    /// Finalize and validate without writing.
    pub fn plan(&self, tree: ProjectTree) -> KeelResult<Synthesis> {
        let synthesis = tree.finalize()?;
        synthesis.validate()?;
        debug!(
            projects = synthesis.projects.len(),
            artifacts = synthesis.artifact_count(),
            "Tree finalized"
        );
        Ok(synthesis)
    }

    // -------------------------------------------------------------------------
    // Internal Helpers
    // -------------------------------------------------------------------------

    fn run_preflight(&self) -> KeelResult<()> {
        for check in &self.preflight {
            let name = check.name();
            debug!(check = %name, "Running preflight check");
            check.check().map_err(|e| ApplicationError::PreflightFailed {
                check: name,
                reason: e.to_string(),
            })?;
        }
        Ok(())
    }

    fn write_all(&self, synthesis: &Synthesis, outdir: &Path) -> KeelResult<SynthesisReport> {
        let mut report = SynthesisReport {
            projects: synthesis.projects.len(),
            ..Default::default()
        };

        for (relative, artifact) in synthesis.files() {
            let path = outdir.join(&relative);

            if artifact.is_sample() && self.filesystem.exists(&path) {
                debug!(path = %path.display(), "Sample exists, skipping");
                report.skipped.push(relative);
                continue;
            }

            if let Some(parent) = path.parent() {
                self.filesystem.create_dir_all(parent)?;
            }
            self.filesystem.write_file(&path, artifact.content())?;
            debug!(path = %path.display(), format = artifact.format().as_str(), "Wrote artifact");
            report.written.push(relative);
        }

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::output::{MockFilesystem, MockPreflight};
    use crate::domain::{Archetype, ProjectSpec};
    use crate::error::KeelError;
    use std::sync::{Arc, Mutex};

    fn single_project_tree() -> ProjectTree {
        let mut tree = ProjectTree::new();
        tree.add_project(ProjectSpec::new("app", Archetype::CdkApp))
            .unwrap();
        tree
    }

    #[test]
    fn failing_preflight_writes_nothing() {
        let mut fs = MockFilesystem::new();
        fs.expect_write_file().never();
        fs.expect_create_dir_all().never();

        let mut check = MockPreflight::new();
        check.expect_name().return_const("kubectl".to_string());
        check.expect_check().returning(|| {
            Err(KeelError::Configuration {
                message: "kubectl not found".into(),
            })
        });

        let service = SynthesisService::new(Box::new(fs)).with_preflight(Box::new(check));
        let err = service.synthesize(single_project_tree(), "/out").unwrap_err();

        assert!(matches!(
            err,
            KeelError::Application(ApplicationError::PreflightFailed { ref check, .. })
                if check == "kubectl"
        ));
    }

    fn recording_filesystem(
        existing: &'static [&'static str],
    ) -> (MockFilesystem, Arc<Mutex<Vec<PathBuf>>>) {
        let written = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&written);

        let mut fs = MockFilesystem::new();
        fs.expect_exists()
            .returning(move |p| existing.iter().any(|e| p == Path::new(e)));
        fs.expect_create_dir_all().returning(|_| Ok(()));
        fs.expect_write_file().returning(move |p, _| {
            sink.lock().unwrap().push(p.to_path_buf());
            Ok(())
        });
        (fs, written)
    }

    #[test]
    fn writes_every_artifact_under_outdir() {
        let (fs, written) = recording_filesystem(&[]);

        let mut check = MockPreflight::new();
        check.expect_name().return_const("node".to_string());
        check.expect_check().times(1).returning(|| Ok(()));

        let service = SynthesisService::new(Box::new(fs)).with_preflight(Box::new(check));
        let report = service.synthesize(single_project_tree(), "/out").unwrap();

        assert_eq!(report.projects, 1);
        assert!(report.written.contains(&PathBuf::from(".projen/tasks.json")));
        assert!(report.skipped.is_empty());

        let written = written.lock().unwrap();
        assert_eq!(written.len(), report.written.len());
        assert!(written.contains(&PathBuf::from("/out/.cz-config.js")));
    }

    #[test]
    fn existing_samples_are_skipped() {
        let (fs, written) = recording_filesystem(&["/out/src/main.ts"]);

        let service = SynthesisService::new(Box::new(fs));
        let report = service.synthesize(single_project_tree(), "/out").unwrap();

        assert_eq!(report.skipped, vec![PathBuf::from("src/main.ts")]);
        assert!(!written.lock().unwrap().contains(&PathBuf::from("/out/src/main.ts")));
    }

    #[test]
    fn plan_touches_no_filesystem() {
        let mut fs = MockFilesystem::new();
        fs.expect_write_file().never();
        fs.expect_exists().never();

        let service = SynthesisService::new(Box::new(fs));
        let synthesis = service.plan(single_project_tree()).unwrap();
        assert!(synthesis.project("app").is_some());
    }
}

//! Implementation of the `keel synth` command.
//!
//! Responsibility: load the manifest, build the tree, hand it to the
//! synthesis service and display results.

use std::path::{Path, PathBuf};

use serde_json::json;
use tracing::{debug, instrument};

use keel_adapters::{BinaryOnPath, LocalFilesystem, ManifestLoader};
use keel_core::{
    application::{SynthesisReport, SynthesisService},
    domain::Synthesis,
    error::KeelError,
};

use crate::{
    cli::{OutputFormat, SynthArgs},
    config::AppConfig,
    error::CliResult,
    output::OutputManager,
};

/// Execute the `keel synth` command.
///
/// 1. Resolve manifest and output paths (flags win over config)
/// 2. Load and build the project tree
/// 3. `--dry-run`: finalize and list, write nothing
/// 4. Otherwise run preflight checks and write every artifact
#[instrument(skip_all)]
pub fn execute(args: SynthArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let manifest_path = args.manifest.unwrap_or_else(|| config.synth.manifest.clone());
    let outdir = args.outdir.unwrap_or_else(|| config.synth.outdir.clone());
    debug!(manifest = %manifest_path.display(), outdir = %outdir.display(), "Synth paths resolved");

    let manifest = ManifestLoader::new(&manifest_path).load()?;
    let tree = manifest.build().map_err(KeelError::from)?;

    let mut service = SynthesisService::new(Box::new(LocalFilesystem::new()));
    for binary in &config.synth.preflight {
        service = service.with_preflight(Box::new(BinaryOnPath::new(binary)));
    }

    if args.dry_run {
        let synthesis = service.plan(tree)?;
        return show_plan(&synthesis, &outdir, &output);
    }

    let spinner = output.spinner(&format!("Synthesizing {}", manifest_path.display()));
    let result = service.synthesize(tree, &outdir);
    if let Some(bar) = spinner {
        bar.finish_and_clear();
    }
    show_report(&result?, &outdir, &output)
}

fn show_plan(synthesis: &Synthesis, outdir: &Path, output: &OutputManager) -> CliResult<()> {
    let files: Vec<(PathBuf, &str, bool)> = synthesis
        .files()
        .map(|(path, artifact)| (path, artifact.format().as_str(), artifact.is_sample()))
        .collect();

    if output.format() == OutputFormat::Json {
        let entries: Vec<_> = files
            .iter()
            .map(|(path, format, sample)| {
                json!({ "path": path.display().to_string(), "format": format, "sample": sample })
            })
            .collect();
        output.json(&json!({ "outdir": outdir.display().to_string(), "files": entries }))?;
        return Ok(());
    }

    output.header(&format!(
        "Dry run: {} projects, {} files under {}",
        synthesis.projects.len(),
        files.len(),
        outdir.display()
    ))?;
    for (path, format, sample) in &files {
        let marker = if *sample { " (sample)" } else { "" };
        output.print(&format!("  {} [{}]{}", path.display(), format, marker))?;
    }
    Ok(())
}

fn show_report(report: &SynthesisReport, outdir: &Path, output: &OutputManager) -> CliResult<()> {
    if output.format() == OutputFormat::Json {
        output.json(&json!({
            "outdir": outdir.display().to_string(),
            "projects": report.projects,
            "written": display_all(&report.written),
            "skipped": display_all(&report.skipped),
        }))?;
        return Ok(());
    }

    for skipped in &report.skipped {
        output.info(&format!("Kept existing {}", skipped.display()))?;
    }
    output.success(&format!(
        "Synthesized {} projects ({} files) into {}",
        report.projects,
        report.written.len(),
        outdir.display()
    ))?;
    Ok(())
}

fn display_all(paths: &[PathBuf]) -> Vec<String> {
    paths.iter().map(|p| p.display().to_string()).collect()
}

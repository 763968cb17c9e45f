//! `keel init`: write a starter manifest.

use tracing::info;

use keel_adapters::manifest_loader::to_toml;
use keel_core::{
    domain::{ManifestProject, ProjectOptions, TreeManifest},
    error::KeelError,
};

use crate::{
    cli::InitArgs,
    config::AppConfig,
    error::{CliError, CliResult, IntoCli},
    output::OutputManager,
};

pub fn execute(args: InitArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let path = args.manifest.unwrap_or_else(|| config.synth.manifest.clone());
    if path.exists() && !args.force {
        return Err(CliError::ManifestExists { path });
    }

    let name = match args.name {
        Some(name) => name,
        None => current_dir_name()?,
    };
    let manifest = TreeManifest {
        project: ManifestProject {
            name,
            archetype: args.archetype,
            outdir: None,
            parent: None,
            options: ProjectOptions::default(),
        },
        subprojects: Vec::new(),
    };
    // Building catches bad names and archetypes before anything is written.
    manifest.build().map_err(KeelError::from)?;

    let text = to_toml(&manifest)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_cli_context(|| format!("Failed to create '{}'", parent.display()))?;
    }
    std::fs::write(&path, text)
        .with_cli_context(|| format!("Failed to write '{}'", path.display()))?;

    info!(path = %path.display(), "Manifest written");
    output.success(&format!("Created {}", path.display()))?;
    output.info("Next: keel synth")?;
    Ok(())
}

fn current_dir_name() -> CliResult<String> {
    let cwd = std::env::current_dir().with_cli_context(|| "Failed to read current directory")?;
    cwd.file_name()
        .and_then(|n| n.to_str())
        .map(str::to_owned)
        .ok_or_else(|| CliError::InvalidInput {
            message: format!(
                "cannot derive a project name from '{}', pass --name",
                cwd.display()
            ),
        })
}

//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums.  No business logic lives here.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name     = "keel",
    bin_name = "keel",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "Composable project archetypes for infrastructure monorepos",
    long_about = "keel builds a tree of infrastructure projects from keel.toml, \
                  places shared tooling where it belongs and synthesizes the \
                  generated configuration files.",
    after_help = "EXAMPLES:\n\
        \x20 keel init --name platform --archetype nx-monorepo\n\
        \x20 keel synth\n\
        \x20 keel synth --dry-run --manifest infra/keel.toml\n\
        \x20 keel archetypes --format json",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Build the project tree and write every generated file.
    #[command(
        visible_alias = "s",
        about = "Synthesize the project tree",
        after_help = "EXAMPLES:\n\
            \x20 keel synth\n\
            \x20 keel synth --outdir build/out\n\
            \x20 keel synth --dry-run"
    )]
    Synth(SynthArgs),

    /// List available archetypes.
    #[command(
        visible_alias = "ls",
        about = "List available archetypes",
        after_help = "EXAMPLES:\n\
            \x20 keel archetypes\n\
            \x20 keel archetypes --format csv"
    )]
    Archetypes(ArchetypesArgs),

    /// Write a starter keel.toml.
    #[command(
        about = "Create a project manifest",
        after_help = "EXAMPLES:\n\
            \x20 keel init\n\
            \x20 keel init --name infra --archetype cdk-app\n\
            \x20 keel init --force"
    )]
    Init(InitArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 keel completions bash > ~/.local/share/bash-completion/completions/keel\n\
            \x20 keel completions zsh  > ~/.zfunc/_keel\n\
            \x20 keel completions fish > ~/.config/fish/completions/keel.fish"
    )]
    Completions(CompletionsArgs),

    /// Inspect the keel configuration.
    #[command(
        about = "Configuration management",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 keel config get synth.outdir\n\
            \x20 keel config list\n\
            \x20 keel config path"
    )]
    Config(ConfigCommands),
}

// ── synth ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct SynthArgs {
    /// Manifest to read (default: `synth.manifest`, usually `keel.toml`).
    #[arg(short = 'm', long = "manifest", value_name = "FILE")]
    pub manifest: Option<PathBuf>,

    /// Directory the root project is written to (default: `synth.outdir`).
    #[arg(short = 'o', long = "outdir", value_name = "DIR")]
    pub outdir: Option<PathBuf>,

    /// Show what would be written without touching the filesystem.
    #[arg(long = "dry-run", help = "Show what would be written without writing")]
    pub dry_run: bool,
}

// ── archetypes ────────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ArchetypesArgs {
    #[arg(
        long = "format",
        value_enum,
        default_value = "table",
        help = "Output format"
    )]
    pub format: ListFormat,
}

/// Output format for the `archetypes` command.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ListFormat {
    /// Human-readable table.
    Table,
    /// One name per line.
    List,
    /// JSON array.
    Json,
    /// CSV rows.
    Csv,
}

// ── init ──────────────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Root project name (default: the current directory's name).
    #[arg(short = 'n', long = "name", value_name = "NAME")]
    pub name: Option<String>,

    /// Root project archetype.
    #[arg(
        short = 'a',
        long = "archetype",
        value_name = "ARCHETYPE",
        default_value = "nx-monorepo"
    )]
    pub archetype: String,

    /// Where to write the manifest (default: `synth.manifest`).
    #[arg(short = 'm', long = "manifest", value_name = "FILE")]
    pub manifest: Option<PathBuf>,

    /// Overwrite an existing manifest.
    #[arg(short = 'f', long = "force", help = "Overwrite existing manifest")]
    pub force: bool,
}

// ── completions ───────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── config subcommands ────────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the value of a configuration key.
    Get {
        /// Dotted key path, e.g. `synth.outdir`.
        key: String,
    },
    /// Print all configuration values.
    List,
    /// Print the path to the default configuration file.
    Path,
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn parse_synth_command() {
        let cli = Cli::parse_from(["keel", "synth", "--dry-run", "-o", "out"]);
        match cli.command {
            Commands::Synth(args) => {
                assert!(args.dry_run);
                assert_eq!(args.outdir, Some(PathBuf::from("out")));
                assert!(args.manifest.is_none());
            }
            other => panic!("expected Synth, got {other:?}"),
        }
    }

    #[test]
    fn synth_alias() {
        let cli = Cli::parse_from(["keel", "s"]);
        assert!(matches!(cli.command, Commands::Synth(_)));
    }

    #[test]
    fn init_defaults_to_monorepo() {
        let cli = Cli::parse_from(["keel", "init"]);
        if let Commands::Init(args) = cli.command {
            assert_eq!(args.archetype, "nx-monorepo");
            assert!(!args.force);
        } else {
            panic!("expected Init command");
        }
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::parse_from(["keel", "archetypes", "-vv", "--log-json"]);
        assert_eq!(cli.global.verbose, 2);
        assert!(cli.global.log_json);
    }

    #[test]
    fn quiet_and_verbose_conflict() {
        let result = Cli::try_parse_from(["keel", "--quiet", "--verbose", "archetypes"]);
        assert!(result.is_err());
    }
}

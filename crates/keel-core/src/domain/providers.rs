//! Terraform provider strategies.
//!
//! A terraform project lists the providers it uses; each provider knows its
//! registry source and how to write its own `provider` blocks. Rendering
//! collects them into one `providers.tf`.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use crate::domain::artifact::{FileArtifact, GENERATED_MARKER};

pub const PROVIDERS_FILE: &str = "providers.tf";

/// How a provider describes itself to the renderer.
pub trait ProviderStrategy {
    /// Provider type name, as used in `provider "<name>"` blocks.
    fn name(&self) -> &'static str;

    /// Registry address, e.g. `hetznercloud/hcloud`.
    fn source(&self) -> &'static str;

    fn version(&self) -> Option<&str>;

    fn alias(&self) -> Option<&str>;

    /// Key in the `required_providers` block.
    fn local_name(&self) -> &str {
        self.alias().unwrap_or(self.name())
    }

    /// Rendered `provider` blocks, one line per entry.
    fn provider_blocks(&self) -> Vec<String>;
}

/// A provider entry in project options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum TerraformProvider {
    Hetzner(HetznerProvider),
}

impl TerraformProvider {
    pub fn strategy(&self) -> &dyn ProviderStrategy {
        match self {
            Self::Hetzner(provider) => provider,
        }
    }
}

// ── Hetzner Cloud ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PollFunction {
    Constant,
    Exponential,
}

impl PollFunction {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Constant => "constant",
            Self::Exponential => "exponential",
        }
    }
}

/// One `provider "hcloud"` block.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HetznerConfig {
    pub alias: Option<String>,
    pub token: Option<String>,
    /// Read the token from `HCLOUD_TOKEN`. On unless set to false.
    pub use_environment_token: Option<bool>,
    pub endpoint: Option<String>,
    pub endpoint_hetzner: Option<String>,
    pub poll_interval: Option<String>,
    pub poll_function: Option<PollFunction>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HetznerProvider {
    pub version: Option<String>,
    pub alias: Option<String>,
    /// Provider blocks to render. Empty means one block that reads the token
    /// from the environment.
    pub configs: Vec<HetznerConfig>,
}

impl HetznerProvider {
    fn render_config(config: &HetznerConfig, lines: &mut Vec<String>) {
        lines.push("provider \"hcloud\" {".to_string());
        if let Some(alias) = &config.alias {
            lines.push(format!("  alias = \"{alias}\""));
        }

        let token = match (config.use_environment_token, &config.token) {
            (Some(false), Some(token)) => format!("  token = \"{token}\""),
            (Some(false), None) => {
                "  # token = var.hcloud_token  # set a token or read it from HCLOUD_TOKEN".into()
            }
            _ => "  # token will be read from HCLOUD_TOKEN environment variable".into(),
        };
        lines.push(token);

        let settings = [
            ("endpoint", config.endpoint.as_deref()),
            ("endpoint_hetzner", config.endpoint_hetzner.as_deref()),
            ("poll_interval", config.poll_interval.as_deref()),
            ("poll_function", config.poll_function.as_ref().map(PollFunction::as_str)),
        ];
        for (key, value) in settings {
            if let Some(value) = value {
                lines.push(format!("  {key} = \"{value}\""));
            }
        }
        lines.push("}".to_string());
    }
}

impl ProviderStrategy for HetznerProvider {
    fn name(&self) -> &'static str {
        "hcloud"
    }

    fn source(&self) -> &'static str {
        "hetznercloud/hcloud"
    }

    fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    fn provider_blocks(&self) -> Vec<String> {
        let default = [HetznerConfig::default()];
        let configs = if self.configs.is_empty() {
            &default[..]
        } else {
            &self.configs[..]
        };

        let mut lines = Vec::new();
        for config in configs {
            Self::render_config(config, &mut lines);
        }
        lines
    }
}

// ── Rendering ────────────────────────────────────────────────────────────────

/// Render `providers.tf`, or nothing when no provider is configured.
///
/// Modules only declare `required_providers`; provider configuration is
/// left to the stack that calls them. The first provider wins when two share
/// a local name.
pub fn render_providers(providers: &[TerraformProvider], configure: bool) -> Option<FileArtifact> {
    if providers.is_empty() {
        return None;
    }

    let mut strategies: Vec<&dyn ProviderStrategy> = Vec::new();
    for strategy in providers.iter().map(TerraformProvider::strategy) {
        if strategies.iter().all(|s| s.local_name() != strategy.local_name()) {
            strategies.push(strategy);
        }
    }

    let mut out = format!("# {GENERATED_MARKER}\n\nterraform {{\n  required_providers {{\n");
    for strategy in &strategies {
        let _ = writeln!(out, "    {} = {{", strategy.local_name());
        let _ = writeln!(out, "      source  = \"{}\"", strategy.source());
        if let Some(version) = strategy.version() {
            let _ = writeln!(out, "      version = \"{version}\"");
        }
        out.push_str("    }\n");
    }
    out.push_str("  }\n}\n");

    if configure {
        for strategy in &strategies {
            out.push('\n');
            for line in strategy.provider_blocks() {
                out.push_str(&line);
                out.push('\n');
            }
        }
    }

    Some(FileArtifact::text(PROVIDERS_FILE, out))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hetzner(configs: Vec<HetznerConfig>) -> TerraformProvider {
        TerraformProvider::Hetzner(HetznerProvider {
            version: Some("~> 1.45".into()),
            alias: None,
            configs,
        })
    }

    #[test]
    fn nothing_to_render_without_providers() {
        assert!(render_providers(&[], true).is_none());
    }

    #[test]
    fn default_block_reads_token_from_environment() {
        let artifact = render_providers(&[hetzner(vec![])], true).unwrap();
        let content = artifact.content();

        assert!(content.starts_with("# ~~ Generated by keel"));
        assert!(content.contains("    hcloud = {\n      source  = \"hetznercloud/hcloud\"\n"));
        assert!(content.contains("      version = \"~> 1.45\"\n"));
        assert!(
            content.contains("provider \"hcloud\" {\n  # token will be read from HCLOUD_TOKEN")
        );
    }

    #[test]
    fn aliased_blocks_keep_their_settings() {
        let configs = vec![
            HetznerConfig {
                alias: Some("dns".into()),
                token: Some("dns-token".into()),
                use_environment_token: Some(false),
                ..Default::default()
            },
            HetznerConfig {
                alias: Some("staging".into()),
                poll_function: Some(PollFunction::Constant),
                poll_interval: Some("1s".into()),
                ..Default::default()
            },
        ];
        let content = render_providers(&[hetzner(configs)], true)
            .unwrap()
            .content()
            .to_string();

        assert_eq!(content.matches("provider \"hcloud\" {").count(), 2);
        assert!(content.contains("  alias = \"dns\"\n  token = \"dns-token\"\n"));
        assert!(content.contains("  poll_interval = \"1s\"\n  poll_function = \"constant\"\n"));
    }

    #[test]
    fn modules_only_declare_requirements() {
        let content = render_providers(&[hetzner(vec![])], false)
            .unwrap()
            .content()
            .to_string();
        assert!(content.contains("required_providers"));
        assert!(!content.contains("provider \"hcloud\""));
    }

    #[test]
    fn duplicate_local_names_render_once() {
        let content = render_providers(&[hetzner(vec![]), hetzner(vec![])], true)
            .unwrap()
            .content()
            .to_string();
        assert_eq!(content.matches("hcloud = {").count(), 1);
    }

    #[test]
    fn provider_deserializes_from_tagged_entry() {
        let provider: TerraformProvider = serde_json::from_value(serde_json::json!({
            "kind": "hetzner",
            "version": "~> 1.45",
            "configs": [{ "alias": "dns", "poll_function": "exponential" }]
        }))
        .unwrap();

        let strategy = provider.strategy();
        assert_eq!(strategy.local_name(), "hcloud");
        assert_eq!(strategy.version(), Some("~> 1.45"));
    }
}

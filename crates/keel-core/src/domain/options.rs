//! Project options and their resolution against tree position.
//!
//! [`ProjectOptions`] is what a caller supplies: every field is optional and
//! `None` means "apply the computed default". [`OptionsResolver::resolve`]
//! turns it into an immutable [`ResolvedOptions`].
//!
//! Resolution is a per-key `explicit.or(default)`, never a blind overlay, so
//! an explicit `false`, `0` or empty string always survives.

use serde::{Deserialize, Serialize};

use crate::domain::capabilities::Flavour;
use crate::domain::providers::TerraformProvider;
use crate::domain::tree::NodeId;
use crate::domain::value_objects::{
    Archetype, K8sVersion, NxVersion, PackageManager, TrailingComma,
};

/// Where a node sits, as far as option defaults are concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreePosition {
    Root,
    Child(NodeId),
}

impl TreePosition {
    pub fn from_parent(parent: Option<NodeId>) -> Self {
        parent.map_or(Self::Root, Self::Child)
    }

    pub fn is_subproject(&self) -> bool {
        matches!(self, Self::Child(_))
    }
}

// ── Caller-supplied options ──────────────────────────────────────────────────

/// Options as written by the caller (manifest or code).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProjectOptions {
    /// Formatting (prettier).
    pub prettier: Option<bool>,
    pub prettier_options: Option<PrettierOptions>,

    /// Linting (eslint).
    pub eslint: Option<bool>,
    pub eslint_options: Option<EslintOptions>,

    /// Editor integration (VS Code settings).
    pub vscode: Option<bool>,

    /// Commit tooling (commitizen).
    pub commitzent: Option<bool>,

    /// Coding-agent guide (`AGENTS.md`) and extra lines appended to it.
    pub agents: Option<bool>,
    pub agents_content: Vec<String>,

    pub sample_code: Option<bool>,
    pub package_manager: Option<PackageManager>,
    pub default_release_branch: Option<String>,

    pub nx_version: Option<NxVersion>,

    pub k8s_version: Option<K8sVersion>,
    pub cdk8s_app_path: Option<String>,
    pub cdk8s_app_file: Option<String>,
    pub cdk8s_output_path: Option<String>,
    pub cdk8s_imports: Vec<String>,

    pub terraform_version: Option<String>,
    pub terraform_providers: Vec<TerraformProvider>,

    /// Local k3d cluster; absent means no cluster is configured.
    pub k3d: Option<LocalClusterOptions>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PrettierOptions {
    pub settings: PrettierSettings,
}

/// Formatter settings; every key is filled independently.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PrettierSettings {
    pub trailing_comma: Option<TrailingComma>,
    pub single_quote: Option<bool>,
    pub bracket_spacing: Option<bool>,
    pub semi: Option<bool>,
    pub print_width: Option<u16>,
    pub tab_width: Option<u8>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EslintOptions {
    pub dirs: Vec<String>,
    pub ignore_patterns: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LocalClusterOptions {
    /// Cluster name; the project name when unset.
    pub name: Option<String>,
    pub servers: Option<u8>,
    pub agents: Option<u8>,
    pub load_balancer_port: Option<u16>,
    pub network: Option<String>,
    pub update_default_kubeconfig: Option<bool>,
    /// Extra k3s arguments, appended after the built-in ones.
    pub k3s_extra_args: Vec<K3sArg>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct K3sArg {
    pub arg: String,
    pub node_filters: Vec<String>,
}

impl K3sArg {
    pub fn new(arg: impl Into<String>, node_filter: impl Into<String>) -> Self {
        Self {
            arg: arg.into(),
            node_filters: vec![node_filter.into()],
        }
    }
}

// ── Resolved options ─────────────────────────────────────────────────────────

/// Final, immutable construction options for one node.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedOptions {
    pub prettier: bool,
    pub prettier_settings: ResolvedPrettierSettings,
    pub eslint: bool,
    pub eslint_options: EslintOptions,
    pub vscode: bool,
    pub commitzent: bool,
    pub agents: bool,
    pub agents_content: Vec<String>,
    pub sample_code: bool,
    pub package_manager: PackageManager,
    pub default_release_branch: String,
    pub nx_version: NxVersion,
    pub container: ContainerOptions,
    pub terraform_version: String,
    pub terraform_providers: Vec<TerraformProvider>,
    pub local_cluster: Option<ResolvedLocalCluster>,
    /// Whether the node has a parent; kept for placement decisions.
    #[serde(skip)]
    pub subproject: bool,
}

/// Rendered as `.prettierrc.json`; unset optional keys stay absent.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedPrettierSettings {
    pub trailing_comma: TrailingComma,
    pub single_quote: bool,
    pub bracket_spacing: bool,
    pub semi: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub print_width: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tab_width: Option<u8>,
}

/// Container-manifest settings after defaults.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerOptions {
    pub k8s_version: K8sVersion,
    pub app_path: String,
    pub app_file: String,
    pub output_path: String,
    pub imports: Vec<String>,
}

/// k3d cluster settings after defaults. The name stays optional until the
/// owning project is known.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedLocalCluster {
    pub name: Option<String>,
    pub servers: u8,
    pub agents: u8,
    pub load_balancer_port: u16,
    pub network: String,
    pub update_default_kubeconfig: bool,
    pub k3s_extra_args: Vec<K3sArg>,
}

// ── Resolver ─────────────────────────────────────────────────────────────────

const DEFAULT_RELEASE_BRANCH: &str = "main";
const DEFAULT_TERRAFORM_VERSION: &str = "1.6.0";
const DEFAULT_CLUSTER_NETWORK: &str = "k3s";
const DEFAULT_LOAD_BALANCER_PORT: u16 = 8080;
const DISABLED_K3S_ADDONS: &[&str] = &["traefik", "metrics-server"];

const CONTAINER_ESLINT_DIRS: &[&str] =
    &["src", "test", "build-tools", "projenrc", ".projenrc.ts"];
const CONTAINER_ESLINT_IGNORES: &[&str] = &[
    "*.js",
    "*.d.ts",
    "node_modules/",
    "*.generated.ts",
    "coverage",
    "**/k8s.ts",
];
const ESLINT_DIRS: &[&str] = &["src", "test"];

/// Computes final options from explicit input and tree position.
pub struct OptionsResolver;

impl OptionsResolver {
    /// Merge `explicit` with defaults computed for `archetype` at `position`.
    ///
    /// Formatting, linting, editor integration and commit tooling default to
    /// on for roots and off for subprojects, so they are governed once at the
    /// top of the tree.
    pub fn resolve(
        explicit: &ProjectOptions,
        archetype: Archetype,
        position: TreePosition,
    ) -> ResolvedOptions {
        let subproject = position.is_subproject();
        let governed_here = !subproject;
        let container = archetype.flavour() == Flavour::ContainerManifest;
        let monorepo = archetype.flavour() == Flavour::Monorepo;

        ResolvedOptions {
            prettier: explicit.prettier.unwrap_or(governed_here),
            prettier_settings: Self::prettier_settings(explicit.prettier_options.as_ref()),
            eslint: explicit.eslint.unwrap_or(governed_here),
            eslint_options: Self::eslint_options(explicit.eslint_options.as_ref(), container),
            vscode: explicit.vscode.unwrap_or(governed_here),
            commitzent: explicit.commitzent.unwrap_or(governed_here),
            agents: explicit.agents.unwrap_or(true),
            agents_content: explicit.agents_content.clone(),
            sample_code: explicit.sample_code.unwrap_or(!(container || monorepo)),
            package_manager: explicit.package_manager.unwrap_or_default(),
            default_release_branch: explicit
                .default_release_branch
                .clone()
                .unwrap_or_else(|| DEFAULT_RELEASE_BRANCH.to_string()),
            nx_version: explicit.nx_version.unwrap_or_default(),
            container: ContainerOptions {
                k8s_version: explicit.k8s_version.unwrap_or_default(),
                app_path: explicit
                    .cdk8s_app_path
                    .clone()
                    .unwrap_or_else(|| "src".to_string()),
                app_file: explicit
                    .cdk8s_app_file
                    .clone()
                    .unwrap_or_else(|| "main.ts".to_string()),
                output_path: explicit
                    .cdk8s_output_path
                    .clone()
                    .unwrap_or_else(|| "kubernetes".to_string()),
                imports: explicit.cdk8s_imports.clone(),
            },
            terraform_version: explicit
                .terraform_version
                .clone()
                .unwrap_or_else(|| DEFAULT_TERRAFORM_VERSION.to_string()),
            terraform_providers: explicit.terraform_providers.clone(),
            local_cluster: explicit.k3d.as_ref().map(Self::local_cluster),
            subproject,
        }
    }

    fn prettier_settings(explicit: Option<&PrettierOptions>) -> ResolvedPrettierSettings {
        let empty = PrettierSettings::default();
        let settings = explicit.map_or(&empty, |o| &o.settings);

        ResolvedPrettierSettings {
            trailing_comma: settings.trailing_comma.unwrap_or(TrailingComma::Es5),
            single_quote: settings.single_quote.unwrap_or(true),
            bracket_spacing: settings.bracket_spacing.unwrap_or(true),
            semi: settings.semi.unwrap_or(true),
            print_width: settings.print_width,
            tab_width: settings.tab_width,
        }
    }

    fn local_cluster(explicit: &LocalClusterOptions) -> ResolvedLocalCluster {
        let mut k3s_extra_args: Vec<K3sArg> = DISABLED_K3S_ADDONS
            .iter()
            .map(|addon| K3sArg::new(format!("--disable={addon}"), "server:*"))
            .collect();
        k3s_extra_args.extend(explicit.k3s_extra_args.iter().cloned());

        ResolvedLocalCluster {
            name: explicit.name.clone(),
            servers: explicit.servers.unwrap_or(1),
            agents: explicit.agents.unwrap_or(0),
            load_balancer_port: explicit
                .load_balancer_port
                .unwrap_or(DEFAULT_LOAD_BALANCER_PORT),
            network: explicit
                .network
                .clone()
                .unwrap_or_else(|| DEFAULT_CLUSTER_NETWORK.to_string()),
            update_default_kubeconfig: explicit.update_default_kubeconfig.unwrap_or(true),
            k3s_extra_args,
        }
    }

    fn eslint_options(explicit: Option<&EslintOptions>, container: bool) -> EslintOptions {
        let (dirs, ignores): (&[&str], &[&str]) = if container {
            (CONTAINER_ESLINT_DIRS, CONTAINER_ESLINT_IGNORES)
        } else {
            (ESLINT_DIRS, &[])
        };
        let to_owned = |items: &[&str]| items.iter().map(|s| s.to_string()).collect::<Vec<_>>();

        match explicit {
            Some(options) => options.clone(),
            None => EslintOptions {
                dirs: to_owned(dirs),
                ignore_patterns: to_owned(ignores),
            },
        }
    }
}

//! Local k3d cluster: `k3d.yaml` plus lifecycle tasks.

use serde::Serialize;

use crate::domain::artifact::FileArtifact;
use crate::domain::components::{Finalize, NodeSetup};
use crate::domain::error::DomainError;
use crate::domain::options::{K3sArg, ResolvedLocalCluster};
use crate::domain::tasks::Task;

pub const K3D_FILE: &str = "k3d.yaml";
const K3D_API_VERSION: &str = "k3d.io/v1alpha5";
const K3S_IMAGE: &str = "docker.io/rancher/k3s:v1.30.8-k3s1";

#[derive(Debug, Clone, PartialEq)]
pub struct LocalCluster {
    name: String,
    settings: ResolvedLocalCluster,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct K3dDocument<'a> {
    api_version: &'static str,
    kind: &'static str,
    metadata: Metadata<'a>,
    servers: u8,
    agents: u8,
    network: &'a str,
    image: &'static str,
    ports: Vec<PortMapping>,
    options: ClusterOptions<'a>,
}

#[derive(Serialize)]
struct Metadata<'a> {
    name: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PortMapping {
    port: String,
    node_filters: Vec<&'static str>,
}

#[derive(Serialize)]
struct ClusterOptions<'a> {
    k3s: K3sOptions<'a>,
    kubeconfig: KubeconfigOptions,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct K3sOptions<'a> {
    extra_args: Vec<ExtraArg<'a>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ExtraArg<'a> {
    arg: &'a str,
    node_filters: &'a [String],
}

impl<'a> From<&'a K3sArg> for ExtraArg<'a> {
    fn from(arg: &'a K3sArg) -> Self {
        Self {
            arg: &arg.arg,
            node_filters: &arg.node_filters,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct KubeconfigOptions {
    update_default_kubeconfig: bool,
}

impl LocalCluster {
    /// Create the component and register the cluster lifecycle tasks.
    ///
    /// `fallback_name` names the cluster when the settings do not.
    pub fn install(
        setup: &mut NodeSetup<'_>,
        settings: ResolvedLocalCluster,
        fallback_name: &str,
    ) -> Self {
        let name = settings
            .name
            .clone()
            .unwrap_or_else(|| fallback_name.to_string());

        setup.tasks.add_task(
            Task::new("k3d:create")
                .description("Create the local K3d Kubernetes cluster")
                .say("Creating K3d Cluster")
                .exec(format!("k3d cluster create --config {K3D_FILE}")),
        );
        let lifecycle = [("stop", "Stopping"), ("start", "Starting"), ("delete", "Deleting")];
        for (action, verb) in lifecycle {
            setup.tasks.add_task(
                Task::new(format!("k3d:{action}"))
                    .description(format!("{verb} the local K3d Kubernetes cluster"))
                    .say(format!("{verb} K3d Cluster"))
                    .exec(format!("k3d cluster {action} {name}"))
                    .receive_args(),
            );
        }

        Self { name, settings }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Finalize for LocalCluster {
    fn render(&self) -> Result<Vec<FileArtifact>, DomainError> {
        let settings = &self.settings;
        let document = K3dDocument {
            api_version: K3D_API_VERSION,
            kind: "Simple",
            metadata: Metadata { name: &self.name },
            servers: settings.servers,
            agents: settings.agents,
            network: &settings.network,
            image: K3S_IMAGE,
            ports: vec![PortMapping {
                port: format!("{}:80", settings.load_balancer_port),
                node_filters: vec!["loadbalancer"],
            }],
            options: ClusterOptions {
                k3s: K3sOptions {
                    extra_args: settings.k3s_extra_args.iter().map(ExtraArg::from).collect(),
                },
                kubeconfig: KubeconfigOptions {
                    update_default_kubeconfig: settings.update_default_kubeconfig,
                },
            },
        };
        Ok(vec![FileArtifact::yaml(K3D_FILE, &document)?])
    }
}

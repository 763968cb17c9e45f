//! `AGENTS.md`: a guide for coding agents working in a generated project.
//!
//! The project kind comes from the node's [`Archetype`] tag, so every
//! archetype has exactly one profile and nothing is guessed.

use std::fmt::Write as _;

use crate::domain::artifact::FileArtifact;
use crate::domain::capabilities::Flavour;
use crate::domain::components::Finalize;
use crate::domain::error::DomainError;
use crate::domain::value_objects::Archetype;

pub const AGENTS_FILE: &str = "AGENTS.md";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentsGuide {
    project: String,
    archetype: Archetype,
    custom_content: Vec<String>,
}

/// Archetype-specific parts of the guide.
struct Profile {
    heading: &'static str,
    summary: &'static str,
    features: &'static [&'static str],
    commands: &'static [(&'static str, &'static str)],
    layout: &'static [&'static str],
    resources: &'static [(&'static str, &'static str)],
}

const CDK_RESOURCES: &[(&str, &str)] = &[
    ("AWS CDK Documentation", "https://docs.aws.amazon.com/cdk/"),
    ("CDK API Reference", "https://docs.aws.amazon.com/cdk/api/v2/"),
];

const CDK8S_RESOURCES: &[(&str, &str)] = &[
    ("CDK8s Documentation", "https://cdk8s.io/"),
    ("Kubernetes Documentation", "https://kubernetes.io/docs/"),
];

const TERRAFORM_RESOURCES: &[(&str, &str)] = &[
    ("Terraform Documentation", "https://developer.hashicorp.com/terraform/docs"),
    ("Terraform Registry", "https://registry.terraform.io/"),
];

const LIBRARY_LAYOUT: &[&str] = &[
    "src/                 # Library source code",
    "└── index.ts         # Main library exports",
    "test/                # Unit tests",
    "lib/                 # Compiled TypeScript (generated)",
];

fn profile(archetype: Archetype) -> Profile {
    match archetype {
        Archetype::CdkApp => Profile {
            heading: "CDK Application Project",
            summary: "An AWS CDK TypeScript application that deploys cloud infrastructure.",
            features: &[
                "**Infrastructure as Code**: AWS resources defined in TypeScript",
                "**CDK Constructs**: Reusable cloud components",
            ],
            commands: &[
                ("Synthesize CloudFormation templates", "npx cdk synth"),
                ("Show differences with the deployed stack", "npx cdk diff"),
                ("Deploy the stack", "npx cdk deploy"),
            ],
            layout: &[
                "src/                 # CDK application source code",
                "├── main.ts          # App entry point",
                "└── stacks/          # Stack definitions",
                "test/                # Unit tests",
                "cdk.out/             # Synthesis output (generated)",
            ],
            resources: CDK_RESOURCES,
        },
        Archetype::CdkLibrary => Profile {
            heading: "CDK Construct Library Project",
            summary: "An AWS CDK construct library publishing reusable cloud components.",
            features: &[
                "**Reusable Constructs**: Shareable AWS components",
                "**JSII Compilation**: Bindings for several languages",
            ],
            commands: &[("Build and package the library", "npx projen package")],
            layout: LIBRARY_LAYOUT,
            resources: CDK_RESOURCES,
        },
        Archetype::Cdk8sApp => Profile {
            heading: "CDK8s Application Project",
            summary: "A cdk8s TypeScript application generating Kubernetes manifests.",
            features: &[
                "**Kubernetes as Code**: Resources defined in TypeScript",
                "**Type Safety**: Manifests checked at compile time",
            ],
            commands: &[
                ("Synthesize Kubernetes manifests", "npx projen cdk8s:synth"),
                ("Import Kubernetes API objects", "npx projen cdk8s:import"),
                ("Apply to the current cluster", "kubectl apply -f kubernetes/"),
            ],
            layout: &[
                "src/                 # Charts",
                "└── main.ts          # App entry point",
                "test/                # Chart tests",
                "kubernetes/          # Synthesized manifests (generated)",
            ],
            resources: CDK8S_RESOURCES,
        },
        Archetype::Cdk8sLibrary => Profile {
            heading: "CDK8s Construct Library Project",
            summary: "A cdk8s construct library publishing reusable Kubernetes components.",
            features: &[
                "**Reusable Charts**: Shareable Kubernetes constructs",
                "**Imports**: Typed bindings for CRDs and Helm charts",
            ],
            commands: &[("Import Kubernetes API objects", "npx projen cdk8s:import")],
            layout: LIBRARY_LAYOUT,
            resources: CDK8S_RESOURCES,
        },
        Archetype::CdktfLibrary => Profile {
            heading: "CDKTF Construct Library Project",
            summary: "A CDK for Terraform construct library.",
            features: &["**Terraform Constructs**: Providers and resources in TypeScript"],
            commands: &[("Build and package the library", "npx projen package")],
            layout: LIBRARY_LAYOUT,
            resources: TERRAFORM_RESOURCES,
        },
        Archetype::JsiiLibrary => Profile {
            heading: "JSII Library Project",
            summary: "A jsii library compiled for several target languages.",
            features: &["**Multi-Language**: Bindings generated from one TypeScript source"],
            commands: &[("Build and package the library", "npx projen package")],
            layout: LIBRARY_LAYOUT,
            resources: &[],
        },
        Archetype::NxMonorepo => Profile {
            heading: "Monorepo Project",
            summary: "An Nx monorepo holding several related packages and applications.",
            features: &[
                "**Multiple Packages**: Related projects managed together",
                "**Affected Builds**: Nx only rebuilds what changed",
            ],
            commands: &[
                ("Build all packages", "npx projen build"),
                ("Run a task in one package", "npx nx run <package>:<task>"),
                ("Show the project graph", "npx projen graph"),
            ],
            layout: &[
                "packages/            # Workspace packages",
                "nx.json              # Build graph configuration (generated)",
            ],
            resources: &[("Nx Documentation", "https://nx.dev/")],
        },
        Archetype::TerraformStack => Profile {
            heading: "Terraform Stack Project",
            summary: "A Terraform stack that deploys infrastructure.",
            features: &["**Plan on Compile**: `compile` runs `terraform plan`"],
            commands: &[
                ("Format and validate", "npx projen pre-compile"),
                ("Plan changes", "npx projen terraform:plan"),
                ("Apply changes", "npx projen terraform:apply"),
            ],
            layout: &[
                "main.tf              # Resources",
                "variables.tf         # Inputs",
                "outputs.tf           # Outputs",
            ],
            resources: TERRAFORM_RESOURCES,
        },
        Archetype::TerraformModule => Profile {
            heading: "Terraform Module Project",
            summary: "A reusable Terraform module consumed by stacks.",
            features: &["**Validated**: `pre-compile` formats and validates the module"],
            commands: &[("Format and validate", "npx projen pre-compile")],
            layout: &[
                "main.tf              # Resources",
                "variables.tf         # Inputs",
                "outputs.tf           # Outputs",
            ],
            resources: TERRAFORM_RESOURCES,
        },
    }
}

impl AgentsGuide {
    pub fn new(project: impl Into<String>, archetype: Archetype) -> Self {
        Self {
            project: project.into(),
            archetype,
            custom_content: Vec::new(),
        }
    }

    /// Lines appended under a "Custom Content" heading.
    pub fn with_custom_content(mut self, lines: impl IntoIterator<Item = String>) -> Self {
        self.custom_content.extend(lines);
        self
    }

    pub fn archetype(&self) -> Archetype {
        self.archetype
    }

    fn content(&self) -> String {
        let profile = profile(self.archetype);
        let mut out = String::new();

        let _ = writeln!(out, "# Coding Agents Guide\n");
        let _ = writeln!(
            out,
            "This is the **{}** project. Its configuration files are generated by keel.\n",
            self.project
        );
        let _ = writeln!(out, "## {}\n\n{}\n", profile.heading, profile.summary);
        for feature in profile.features {
            let _ = writeln!(out, "- {feature}");
        }

        out.push_str("\n## Working with keel\n\n");
        out.push_str("- Never edit generated files; change `keel.toml` instead.\n");
        out.push_str("- Run `keel synth` after every configuration change.\n");
        out.push_str("- Files marked as samples are yours to edit; keel never overwrites them.\n");

        out.push_str("\n## Commands\n\n```bash\n");
        out.push_str("# Full build\nnpx projen build\n\n# Run tests\nnpx projen test\n");
        for (description, command) in profile.commands {
            let _ = write!(out, "\n# {description}\n{command}\n");
        }
        out.push_str("```\n");

        if self.archetype.flavour() != Flavour::Terraform {
            out.push_str("\n## Dependencies\n\n");
            out.push_str("Declare packages in `keel.toml`. ");
            out.push_str("`.projen/deps.json` lists the result:\n\n");
            out.push_str("- `runtime`: runtime dependencies\n");
            out.push_str("- `build`: development dependencies\n");
            out.push_str("- `peer`: peer dependencies\n");
        }

        out.push_str("\n## Project Structure\n\n```\n");
        for line in profile.layout {
            let _ = writeln!(out, "{line}");
        }
        out.push_str("```\n");

        if !profile.resources.is_empty() {
            out.push_str("\n## Useful Resources\n\n");
            for (title, url) in profile.resources {
                let _ = writeln!(out, "- [{title}]({url})");
            }
        }

        if !self.custom_content.is_empty() {
            out.push_str("\n## Custom Content\n\n");
            for line in &self.custom_content {
                let _ = writeln!(out, "{line}");
            }
        }
        out
    }
}

impl Finalize for AgentsGuide {
    fn render(&self) -> Result<Vec<FileArtifact>, DomainError> {
        Ok(vec![FileArtifact::text(AGENTS_FILE, self.content())])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rendered(guide: &AgentsGuide) -> String {
        let artifacts = guide.render().unwrap();
        assert_eq!(artifacts.len(), 1);
        assert_eq!(artifacts[0].path().to_str(), Some(AGENTS_FILE));
        artifacts[0].content().to_string()
    }

    #[test]
    fn guide_follows_archetype_tag() {
        let content = rendered(&AgentsGuide::new("cluster", Archetype::Cdk8sApp));
        assert!(content.contains("**cluster**"));
        assert!(content.contains("## CDK8s Application Project"));
        assert!(content.contains("npx projen cdk8s:synth"));
        assert!(content.contains("https://cdk8s.io/"));
    }

    #[test]
    fn every_archetype_has_a_profile() {
        for archetype in Archetype::ALL {
            let content = rendered(&AgentsGuide::new("p", archetype));
            assert!(content.starts_with("# Coding Agents Guide"), "{archetype}");
        }
    }

    #[test]
    fn terraform_guide_skips_package_dependencies() {
        let content = rendered(&AgentsGuide::new("network", Archetype::TerraformStack));
        assert!(content.contains("terraform:apply"));
        assert!(!content.contains("## Dependencies"));
    }

    #[test]
    fn custom_content_comes_last() {
        let guide = AgentsGuide::new("app", Archetype::CdkApp)
            .with_custom_content(["Deploy from CI only.".to_string()]);
        let content = rendered(&guide);
        assert!(content.trim_end().ends_with("## Custom Content\n\nDeploy from CI only."));
    }
}

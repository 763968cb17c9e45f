//! Archetype capability registry.
//!
//! Every archetype is described exactly once by an [`ArchetypeDef`]. All
//! archetype-specific decisions (does it synthesize container manifests, does
//! it own the build graph, which defaults does it impose) are table lookups
//! against [`ARCHETYPE_REGISTRY`], keyed by the explicit [`Archetype`] tag.
//!
//! # Adding a New Archetype
//!
//! 1. Add a variant to `Archetype` in `value_objects.rs`
//! 2. Add one [`ArchetypeDef`] entry to [`ARCHETYPE_REGISTRY`]
//! 3. Wire any archetype-only tasks in `construct.rs`

use crate::domain::value_objects::Archetype;

/// Broad family an archetype belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Flavour {
    /// AWS CDK, CDKTF and jsii construct projects.
    CloudInfrastructure,
    /// cdk8s projects producing Kubernetes manifests.
    ContainerManifest,
    /// Workspace root orchestrating subprojects.
    Monorepo,
    /// Plain Terraform stacks and modules.
    Terraform,
}

impl Flavour {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::CloudInfrastructure => "cloud-infrastructure",
            Self::ContainerManifest => "container-manifest",
            Self::Monorepo => "monorepo",
            Self::Terraform => "terraform",
        }
    }
}

/// Describes everything the engine needs to know about one archetype.
#[derive(Debug, Clone, Copy)]
pub struct ArchetypeDef {
    pub archetype: Archetype,
    pub flavour: Flavour,
    pub description: &'static str,

    /// Whether the archetype is a library (published) rather than an app
    /// (deployed). Libraries never synthesize deployable output.
    pub library: bool,

    /// Whether the node owns the build-graph registry for its subtree.
    pub owns_build_graph: bool,

    /// Whether the project renders JavaScript tooling (formatter, linter,
    /// editor settings). Terraform projects still get editor settings.
    pub javascript: bool,
}

const CDK_APP: ArchetypeDef = ArchetypeDef {
    archetype: Archetype::CdkApp,
    flavour: Flavour::CloudInfrastructure,
    description: "AWS CDK TypeScript application",
    library: false,
    owns_build_graph: false,
    javascript: true,
};

const CDK_LIBRARY: ArchetypeDef = ArchetypeDef {
    archetype: Archetype::CdkLibrary,
    flavour: Flavour::CloudInfrastructure,
    description: "AWS CDK construct library",
    library: true,
    owns_build_graph: false,
    javascript: true,
};

const CDK8S_APP: ArchetypeDef = ArchetypeDef {
    archetype: Archetype::Cdk8sApp,
    flavour: Flavour::ContainerManifest,
    description: "cdk8s application synthesizing Kubernetes manifests",
    library: false,
    owns_build_graph: false,
    javascript: true,
};

const CDK8S_LIBRARY: ArchetypeDef = ArchetypeDef {
    archetype: Archetype::Cdk8sLibrary,
    flavour: Flavour::ContainerManifest,
    description: "cdk8s construct library",
    library: true,
    owns_build_graph: false,
    javascript: true,
};

const CDKTF_LIBRARY: ArchetypeDef = ArchetypeDef {
    archetype: Archetype::CdktfLibrary,
    flavour: Flavour::CloudInfrastructure,
    description: "CDK for Terraform construct library",
    library: true,
    owns_build_graph: false,
    javascript: true,
};

const JSII_LIBRARY: ArchetypeDef = ArchetypeDef {
    archetype: Archetype::JsiiLibrary,
    flavour: Flavour::CloudInfrastructure,
    description: "jsii multi-language library",
    library: true,
    owns_build_graph: false,
    javascript: true,
};

const NX_MONOREPO: ArchetypeDef = ArchetypeDef {
    archetype: Archetype::NxMonorepo,
    flavour: Flavour::Monorepo,
    description: "Nx monorepo root orchestrating subprojects",
    library: false,
    owns_build_graph: true,
    javascript: true,
};

const TERRAFORM_STACK: ArchetypeDef = ArchetypeDef {
    archetype: Archetype::TerraformStack,
    flavour: Flavour::Terraform,
    description: "Terraform stack deploying infrastructure",
    library: false,
    owns_build_graph: false,
    javascript: false,
};

const TERRAFORM_MODULE: ArchetypeDef = ArchetypeDef {
    archetype: Archetype::TerraformModule,
    flavour: Flavour::Terraform,
    description: "Reusable Terraform module",
    library: true,
    owns_build_graph: false,
    javascript: false,
};

/// Single source of truth for archetype capabilities, in listing order.
pub static ARCHETYPE_REGISTRY: &[ArchetypeDef] = &[
    CDK_APP,
    CDK_LIBRARY,
    CDK8S_APP,
    CDK8S_LIBRARY,
    CDKTF_LIBRARY,
    JSII_LIBRARY,
    NX_MONOREPO,
    TERRAFORM_STACK,
    TERRAFORM_MODULE,
];

/// Look up an archetype definition.
///
/// The match is exhaustive, so a new variant cannot compile without one.
pub fn find_archetype(archetype: Archetype) -> &'static ArchetypeDef {
    match archetype {
        Archetype::CdkApp => &CDK_APP,
        Archetype::CdkLibrary => &CDK_LIBRARY,
        Archetype::Cdk8sApp => &CDK8S_APP,
        Archetype::Cdk8sLibrary => &CDK8S_LIBRARY,
        Archetype::CdktfLibrary => &CDKTF_LIBRARY,
        Archetype::JsiiLibrary => &JSII_LIBRARY,
        Archetype::NxMonorepo => &NX_MONOREPO,
        Archetype::TerraformStack => &TERRAFORM_STACK,
        Archetype::TerraformModule => &TERRAFORM_MODULE,
    }
}

impl Archetype {
    pub fn def(self) -> &'static ArchetypeDef {
        find_archetype(self)
    }

    pub fn flavour(self) -> Flavour {
        self.def().flavour
    }

    /// Container-manifest apps run `cdk8s synth`; libraries only import.
    pub fn synthesizes_manifests(self) -> bool {
        let def = self.def();
        def.flavour == Flavour::ContainerManifest && !def.library
    }

    pub fn owns_build_graph(self) -> bool {
        self.def().owns_build_graph
    }

    pub fn is_javascript(self) -> bool {
        self.def().javascript
    }
}

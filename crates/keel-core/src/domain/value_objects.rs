//! Domain value objects: Archetype, PackageManager, tool versions.
//!
//! # Design
//!
//! These are pure value types: `Copy` and compared by value.
//! Archetype behaviour (what flavour it is, which components it carries)
//! lives in `capabilities.rs`; this file only defines the types, their
//! string representations and their `FromStr` parsers.

use crate::domain::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ── Archetype ────────────────────────────────────────────────────────────────

/// The kind of project a tree node was constructed as.
///
/// Set once at construction and passed explicitly to everything that needs
/// archetype-specific behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Archetype {
    CdkApp,
    CdkLibrary,
    Cdk8sApp,
    Cdk8sLibrary,
    CdktfLibrary,
    JsiiLibrary,
    NxMonorepo,
    TerraformStack,
    TerraformModule,
}

impl Archetype {
    pub const ALL: [Archetype; 9] = [
        Self::CdkApp,
        Self::CdkLibrary,
        Self::Cdk8sApp,
        Self::Cdk8sLibrary,
        Self::CdktfLibrary,
        Self::JsiiLibrary,
        Self::NxMonorepo,
        Self::TerraformStack,
        Self::TerraformModule,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::CdkApp => "cdk-app",
            Self::CdkLibrary => "cdk-library",
            Self::Cdk8sApp => "cdk8s-app",
            Self::Cdk8sLibrary => "cdk8s-library",
            Self::CdktfLibrary => "cdktf-library",
            Self::JsiiLibrary => "jsii-library",
            Self::NxMonorepo => "nx-monorepo",
            Self::TerraformStack => "terraform-stack",
            Self::TerraformModule => "terraform-module",
        }
    }
}

impl fmt::Display for Archetype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Archetype {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('_', "-");
        match wanted.as_str() {
            "monorepo" | "nx" => return Ok(Self::NxMonorepo),
            "terraform" => return Ok(Self::TerraformStack),
            _ => {}
        }
        Self::ALL
            .into_iter()
            .find(|a| a.as_str() == wanted)
            .ok_or_else(|| DomainError::UnknownArchetype {
                value: s.to_string(),
            })
    }
}

// ── PackageManager ───────────────────────────────────────────────────────────

/// Node package manager used by the generated project.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageManager {
    Npm,
    Yarn,
    #[default]
    Pnpm,
    Bun,
}

impl PackageManager {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Npm => "npm",
            Self::Yarn => "yarn",
            Self::Pnpm => "pnpm",
            Self::Bun => "bun",
        }
    }

    /// Lock file name, referenced by the shared build-graph inputs.
    pub const fn lock_file(&self) -> &'static str {
        match self {
            Self::Npm => "package-lock.json",
            Self::Yarn => "yarn.lock",
            Self::Pnpm => "pnpm-lock.yaml",
            Self::Bun => "bun.lockb",
        }
    }

    /// Install command that refuses to touch the lock file, for CI.
    pub const fn frozen_install(&self) -> &'static str {
        match self {
            Self::Npm => "npm ci",
            Self::Yarn => "yarn install --check-files --frozen-lockfile",
            Self::Pnpm => "pnpm i --frozen-lockfile",
            Self::Bun => "bun install --frozen-lockfile",
        }
    }
}

impl fmt::Display for PackageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PackageManager {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "npm" => Ok(Self::Npm),
            "yarn" => Ok(Self::Yarn),
            "pnpm" => Ok(Self::Pnpm),
            "bun" => Ok(Self::Bun),
            other => Err(DomainError::UnknownValue {
                what: "package manager",
                value: other.to_string(),
            }),
        }
    }
}

// ── NxVersion ────────────────────────────────────────────────────────────────

/// Major version of the build-graph tool.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NxVersion {
    #[default]
    #[serde(rename = "22")]
    V22,
    #[serde(rename = "21")]
    V21,
    #[serde(rename = "20")]
    V20,
    #[serde(rename = "19")]
    V19,
}

impl NxVersion {
    pub const fn major(&self) -> &'static str {
        match self {
            Self::V22 => "22",
            Self::V21 => "21",
            Self::V20 => "20",
            Self::V19 => "19",
        }
    }
}

impl fmt::Display for NxVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.major())
    }
}

// ── K8sVersion ───────────────────────────────────────────────────────────────

/// Kubernetes API version targeted by container manifests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum K8sVersion {
    #[serde(rename = "1.29.0")]
    V1_29,
    #[default]
    #[serde(rename = "1.30.0")]
    V1_30,
    #[serde(rename = "1.31.0")]
    V1_31,
    #[serde(rename = "1.32.0")]
    V1_32,
    #[serde(rename = "1.33.0")]
    V1_33,
}

impl K8sVersion {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::V1_29 => "1.29.0",
            Self::V1_30 => "1.30.0",
            Self::V1_31 => "1.31.0",
            Self::V1_32 => "1.32.0",
            Self::V1_33 => "1.33.0",
        }
    }

    /// Minor version, used to pick the matching `cdk8s-plus-<minor>` package.
    pub const fn minor(&self) -> &'static str {
        match self {
            Self::V1_29 => "29",
            Self::V1_30 => "30",
            Self::V1_31 => "31",
            Self::V1_32 => "32",
            Self::V1_33 => "33",
        }
    }
}

impl fmt::Display for K8sVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── TrailingComma ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrailingComma {
    All,
    #[default]
    Es5,
    None,
}

// ── DependencyKind ───────────────────────────────────────────────────────────

/// How a package dependency is consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DependencyKind {
    Runtime,
    Build,
    Devenv,
    Peer,
    Test,
}

impl fmt::Display for DependencyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Runtime => "runtime",
            Self::Build => "build",
            Self::Devenv => "devenv",
            Self::Peer => "peer",
            Self::Test => "test",
        })
    }
}

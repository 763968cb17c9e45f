//! Integration tests for the keel binary.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const MANIFEST: &str = r#"
[project]
name = "platform"
archetype = "nx-monorepo"

[[subprojects]]
name = "cluster"
archetype = "cdk8s-app"

[[subprojects]]
name = "network"
archetype = "terraform-stack"
outdir = "infra/network"
"#;

/// A command isolated from the user's config file and environment.
fn keel(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("keel").unwrap();
    cmd.current_dir(dir.path())
        .env("NO_COLOR", "true")
        .env_remove("RUST_LOG")
        .env_remove("KEEL_SYNTH__PREFLIGHT")
        .env_remove("KEEL_SYNTH__OUTDIR")
        .env_remove("KEEL_SYNTH__MANIFEST");
    cmd
}

fn workspace_with_manifest() -> TempDir {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("keel.toml"), MANIFEST).unwrap();
    temp
}

#[test]
fn help_lists_commands() {
    let temp = TempDir::new().unwrap();
    keel(&temp)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("synth"))
        .stdout(predicate::str::contains("archetypes"));
}

#[test]
fn version_flag() {
    let temp = TempDir::new().unwrap();
    keel(&temp)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn archetypes_as_list() {
    let temp = TempDir::new().unwrap();
    keel(&temp)
        .args(["archetypes", "--format", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("cdk8s-app"))
        .stdout(predicate::str::contains("terraform-module"));
}

#[test]
fn archetypes_as_json() {
    let temp = TempDir::new().unwrap();
    let out = keel(&temp)
        .args(["archetypes", "--format", "json"])
        .output()
        .unwrap();
    assert!(out.status.success());

    let value: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    let ids: Vec<&str> = value
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|a| a["id"].as_str())
        .collect();
    assert!(ids.contains(&"nx-monorepo"));
}

#[test]
fn synth_writes_the_tree() {
    let temp = workspace_with_manifest();
    keel(&temp)
        .arg("synth")
        .assert()
        .success()
        .stdout(predicate::str::contains("Synthesized 3 projects"));

    let root = temp.path();
    assert!(root.join("nx.json").exists());
    assert!(root.join(".cz-config.js").exists());
    assert!(root.join(".vscode/settings.json").exists());
    assert!(root.join("packages/cluster/cdk8s.yaml").exists());
    assert!(root.join("infra/network/.projen/tasks.json").exists());
    assert!(!root.join("packages/cluster/.vscode").exists());

    let nx = fs::read_to_string(root.join("nx.json")).unwrap();
    assert!(nx.contains("cdk8s:synth"));
}

#[test]
fn synth_keeps_edited_samples() {
    let temp = workspace_with_manifest();
    let sample = temp.path().join("packages/cluster/src/main.ts");
    fs::create_dir_all(sample.parent().unwrap()).unwrap();
    fs::write(&sample, "// hand written\n").unwrap();

    keel(&temp).arg("synth").assert().success();

    assert_eq!(fs::read_to_string(&sample).unwrap(), "// hand written\n");
}

#[test]
fn dry_run_writes_nothing() {
    let temp = workspace_with_manifest();
    keel(&temp)
        .args(["synth", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("packages/cluster/cdk8s.yaml"));

    assert!(!temp.path().join("nx.json").exists());
}

#[test]
fn synth_into_outdir() {
    let temp = workspace_with_manifest();
    keel(&temp)
        .args(["synth", "--outdir", "out"])
        .assert()
        .success();
    assert!(temp.path().join("out/nx.json").exists());
}

#[test]
fn missing_manifest_exits_not_found() {
    let temp = TempDir::new().unwrap();
    keel(&temp)
        .arg("synth")
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Manifest not found"))
        .stderr(predicate::str::contains("keel init"));
}

#[test]
fn unknown_archetype_is_reported() {
    let temp = TempDir::new().unwrap();
    fs::write(
        temp.path().join("keel.toml"),
        "[project]\nname = \"x\"\narchetype = \"helm-chart\"\n",
    )
    .unwrap();

    keel(&temp)
        .arg("synth")
        .assert()
        .failure()
        .stderr(predicate::str::contains("helm-chart"));
}

#[test]
fn failed_preflight_writes_nothing() {
    let temp = workspace_with_manifest();
    keel(&temp)
        .env("KEEL_SYNTH__PREFLIGHT", "keel-test-missing-binary")
        .arg("synth")
        .assert()
        .code(4)
        .stderr(predicate::str::contains("keel-test-missing-binary"));

    assert!(!temp.path().join("nx.json").exists());
}

#[test]
fn init_then_synth() {
    let temp = TempDir::new().unwrap();
    keel(&temp)
        .args(["init", "--name", "infra", "--archetype", "cdk-app"])
        .assert()
        .success();

    let manifest = fs::read_to_string(temp.path().join("keel.toml")).unwrap();
    assert!(manifest.contains("infra"));

    keel(&temp).arg("synth").assert().success();
    assert!(temp.path().join(".projen/tasks.json").exists());
}

#[test]
fn init_refuses_to_overwrite() {
    let temp = workspace_with_manifest();
    keel(&temp)
        .args(["init", "--name", "platform"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--force"));

    assert_eq!(
        fs::read_to_string(temp.path().join("keel.toml")).unwrap(),
        MANIFEST
    );
}

#[test]
fn config_reads_environment() {
    let temp = TempDir::new().unwrap();
    keel(&temp)
        .env("KEEL_SYNTH__OUTDIR", "build")
        .args(["config", "get", "synth.outdir"])
        .assert()
        .success()
        .stdout(predicate::str::contains("build"));
}

#[test]
fn config_unknown_key_is_configuration_error() {
    let temp = TempDir::new().unwrap();
    keel(&temp)
        .args(["config", "get", "nope"])
        .assert()
        .code(4);
}

#[test]
fn completions_for_bash() {
    let temp = TempDir::new().unwrap();
    keel(&temp)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("keel"));
}

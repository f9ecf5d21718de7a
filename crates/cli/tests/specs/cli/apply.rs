// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `bca apply` failures that are caught before contacting a cluster

use crate::prelude::*;

#[test]
fn missing_change_file_fails() {
    let temp = Project::empty();
    let missing = temp.path().join("absent.yaml");
    cli()
        .args(&["apply", missing.to_str().unwrap()])
        .exits(1)
        .stderr_has("failed to read change file");
}

#[test]
fn wrong_kind_is_rejected() {
    let temp = Project::empty();
    let change = temp.file(
        "change.yaml",
        r#"apiVersion: bca/v1
kind: Deployment
metadata:
  name: codeowners
spec:
  agent: copilot-cli
  prompt: Add a CODEOWNERS file
  repos:
    - https://github.com/acme/widgets
"#,
    );
    cli().args(&["apply", change.to_str().unwrap()]).exits(1).stderr_has("Change");
}

#[test]
fn empty_repo_list_is_rejected() {
    let temp = Project::empty();
    let change = temp.file(
        "change.yaml",
        r#"apiVersion: bca/v1
kind: Change
metadata:
  name: codeowners
spec:
  agent: copilot-cli
  prompt: Add a CODEOWNERS file
  repos: []
"#,
    );
    cli().args(&["apply", change.to_str().unwrap()]).exits(1).stderr_has("invalid change");
}

#[test]
fn negative_retries_is_a_usage_error() {
    cli().args(&["apply", "change.yaml", "--retries", "-2"]).exits(2);
}

#[test]
fn malformed_config_file_fails_early() {
    let temp = Project::empty();
    let config = temp.file("config.toml", "namespace = [\n");
    cli()
        .args(&["--config", config.to_str().unwrap(), "apply", "change.yaml"])
        .exits(1)
        .stderr_has("invalid config file");
}

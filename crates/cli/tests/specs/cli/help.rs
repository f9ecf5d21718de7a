// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Help and usage output

use crate::prelude::*;

#[test]
fn help_lists_commands() {
    cli().args(&["--help"]).passes().stdout_has("Usage:").stdout_has("apply").stdout_has("k8s");
}

#[test]
fn no_args_is_a_usage_error() {
    cli().exits(2).stderr_has("Usage:");
}

#[test]
fn apply_help_shows_flags() {
    cli()
        .args(&["apply", "--help"])
        .passes()
        .stdout_has("--no-wait")
        .stdout_has("--retries")
        .stdout_has("--fork-org")
        .stdout_has("--namespace");
}

#[test]
fn k8s_help_shows_subcommands() {
    cli().args(&["k8s", "--help"]).passes().stdout_has("setup").stdout_has("status");
}

#[test]
fn version_shows_version() {
    cli().args(&["--version"]).passes().stdout_has("0.1");
}

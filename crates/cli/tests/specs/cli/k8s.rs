// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `bca k8s` argument handling

use crate::prelude::*;

#[test]
fn setup_without_github_token_fails_before_connecting() {
    let temp = Project::empty();
    cli()
        .env("HOME", temp.path())
        .args(&["k8s", "setup"])
        .exits(1)
        .stderr_has("github token is required");
}

#[test]
fn status_needs_job_names() {
    cli().args(&["k8s", "status"]).exits(2);
}

#[test]
fn gemini_key_and_oauth_conflict() {
    cli().args(&["k8s", "setup", "--gemini-api-key", "k", "--gemini-oauth"]).exits(2);
}

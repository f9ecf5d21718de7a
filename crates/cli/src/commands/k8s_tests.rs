// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use bca_adapters::FakeCluster;
use bca_core::credentials::{GEMINI_API_KEY, GITHUB_TOKEN};
use bca_core::JobStatus;
use clap::Parser;
use k8s_openapi::api::batch::v1::Job;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use serial_test::serial;

#[derive(Parser)]
struct TestCli {
    #[command(subcommand)]
    command: K8sCommand,
}

fn parse(argv: &[&str]) -> Result<K8sCommand, clap::Error> {
    let argv = std::iter::once("bca-k8s").chain(argv.iter().copied());
    TestCli::try_parse_from(argv).map(|cli| cli.command)
}

fn clear_env() {
    for var in ["GITHUB_TOKEN", "COPILOT_TOKEN", "GEMINI_API_KEY"] {
        std::env::remove_var(var);
    }
}

#[test]
fn status_requires_job_names() {
    assert!(parse(&["status"]).is_err());
    let K8sCommand::Status { jobs, cluster } =
        parse(&["status", "job-a", "job-b", "--namespace", "agents"]).unwrap()
    else {
        panic!("expected status");
    };
    assert_eq!(jobs, vec!["job-a", "job-b"]);
    assert_eq!(cluster.namespace.as_deref(), Some("agents"));
}

#[test]
fn gemini_key_conflicts_with_oauth() {
    assert!(parse(&["setup", "--gemini-api-key", "k", "--gemini-oauth"]).is_err());
}

#[test]
#[serial]
fn github_token_is_required() {
    clear_env();
    let err = SetupArgs::default().bundle(None).unwrap_err();
    assert!(err.downcast_ref::<bca_core::CredentialError>().is_some(), "{err}");
}

#[test]
#[serial]
fn flags_win_over_environment() {
    clear_env();
    std::env::set_var("GITHUB_TOKEN", "ghp_env");
    std::env::set_var("COPILOT_TOKEN", "cop_env");
    let args = SetupArgs { github_token: Some("ghp_flag".to_string()), ..Default::default() };
    let bundle = args.bundle(None);
    clear_env();

    let bundle = bundle.unwrap();
    assert_eq!(bundle.get(GITHUB_TOKEN), Some("ghp_flag"));
    assert_eq!(bundle.get(COPILOT_TOKEN), Some("cop_env"));
    assert!(!bundle.contains(GEMINI_API_KEY));
}

#[test]
#[serial]
fn oauth_reads_files_and_ignores_env_api_key() {
    clear_env();
    std::env::set_var("GEMINI_API_KEY", "from-env");
    let home = tempfile::tempdir().unwrap();
    let gemini = home.path().join(".gemini");
    std::fs::create_dir(&gemini).unwrap();
    for file in bca_core::agent::GEMINI_OAUTH_FILES {
        std::fs::write(gemini.join(file.path), format!("{{\"file\":\"{}\"}}", file.path)).unwrap();
    }

    let args = SetupArgs {
        github_token: Some("ghp_flag".to_string()),
        gemini_oauth: true,
        ..Default::default()
    };
    let bundle = args.bundle(Some(home.path()));
    clear_env();

    let bundle = bundle.unwrap();
    assert!(!bundle.contains(GEMINI_API_KEY));
    for file in bca_core::agent::GEMINI_OAUTH_FILES {
        assert!(bundle.contains(file.key), "missing {}", file.key);
    }
}

#[test]
#[serial]
fn oauth_without_home_is_an_error() {
    clear_env();
    let args = SetupArgs {
        github_token: Some("ghp_flag".to_string()),
        gemini_oauth: true,
        ..Default::default()
    };
    assert!(args.bundle(None).is_err());
}

async fn submit(fake: &FakeCluster, name: &str, repo: &str) {
    let job = Job {
        metadata: ObjectMeta {
            name: Some(name.to_string()),
            labels: Some(
                [("repo".to_string(), bca_core::sanitize_label(repo))].into_iter().collect(),
            ),
            ..Default::default()
        },
        ..Default::default()
    };
    fake.create_job(&job).await.unwrap();
}

#[tokio::test]
async fn status_lookups_continue_past_missing_jobs() {
    let fake = FakeCluster::default();
    fake.script_status("r1", [JobStatus::Running]);
    fake.script_status("r2", [JobStatus::Complete]);
    submit(&fake, "job-1", "r1").await;
    submit(&fake, "job-2", "r2").await;

    let jobs: Vec<String> = ["job-1", "missing", "job-2"].map(String::from).to_vec();
    let (summary, failures) = query_statuses(&fake, &jobs).await;

    assert_eq!(failures, 1);
    assert_eq!(summary.keys().collect::<Vec<_>>(), vec!["job-1", "job-2"]);
    assert_eq!(summary["job-1"], JobStatus::Running);
    assert_eq!(summary["job-2"], JobStatus::Complete);
}

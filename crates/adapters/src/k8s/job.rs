// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job spec construction: one Job per repository.
//!
//! Every stage shares the `workspace` emptyDir and reads the credential bundle
//! through `envFrom`. Stage order is fixed:
//!
//! ```text
//! fork-setup (Fork policy only)  → writes /workspace/fork-url.txt
//! git-clone                      → clones into /workspace/repo
//! runner                         → bca-runner against /workspace/repo
//! ```

use std::collections::BTreeMap;

use bca_core::{derive_job_name, sanitize_label, AgentDef, ChangeSpec, CredentialDelivery};
use k8s_openapi::api::batch::v1::{Job, JobSpec};
use k8s_openapi::api::core::v1::{
    Container, EmptyDirVolumeSource, EnvFromSource, EnvVar, KeyToPath, PodSpec, PodTemplateSpec,
    SecretEnvSource, SecretVolumeSource, Volume, VolumeMount,
};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;

/// Secret holding the credential bundle, one per namespace.
pub const CREDENTIALS_SECRET: &str = "bca-credentials";
pub const DEFAULT_IMAGE: &str = "ghcr.io/background-coding-agent/runner:latest";
pub const DEFAULT_TTL_SECS: i32 = 300;

pub const WORKSPACE_VOLUME: &str = "workspace";
pub const WORKSPACE_PATH: &str = "/workspace";
/// Artifact written by fork-setup and read by git-clone.
pub const FORK_URL_FILE: &str = "/workspace/fork-url.txt";
pub const REPO_DIR: &str = "/workspace/repo";

pub const FORK_SETUP_STAGE: &str = "fork-setup";
pub const GIT_CLONE_STAGE: &str = "git-clone";
pub const RUNNER_STAGE: &str = "runner";

const OAUTH_VOLUME: &str = "agent-oauth";
const PULL_POLICY: &str = "IfNotPresent";

const FORK_SETUP_SCRIPT: &str = include_str!("scripts/fork-setup.sh");
const GIT_CLONE_SCRIPT: &str = include_str!("scripts/git-clone.sh");
const RUNNER_SCRIPT: &str = include_str!("scripts/job-runner.sh");

/// Whether changes are pushed to a fork or directly to the original repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ForkPolicy {
    /// Fork under `org`, or under the token's user when `None`.
    Fork { org: Option<String> },
    Direct,
}

impl Default for ForkPolicy {
    fn default() -> Self {
        ForkPolicy::Fork { org: None }
    }
}

/// Parameters for building one repository's Job.
pub struct JobParams<'a> {
    pub change: &'a ChangeSpec,
    pub repo_url: &'a str,
    pub namespace: &'a str,
    /// Used when the change does not name an image
    pub default_image: &'a str,
    /// Becomes `backoffLimit`
    pub retries: i32,
    pub ttl_secs: i32,
    pub fork: &'a ForkPolicy,
}

/// Fixed ownership labels plus the sanitized repository.
pub fn job_labels(repo_url: &str) -> BTreeMap<String, String> {
    [
        ("app", "background-coding-agent".to_string()),
        ("app.kubernetes.io/name", "bca".to_string()),
        ("app.kubernetes.io/component", "job".to_string()),
        ("app.kubernetes.io/managed-by", "bca-cli".to_string()),
        ("repo", sanitize_label(repo_url)),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v))
    .collect()
}

/// Build the Job for one repository. The name carries a fresh random suffix.
pub fn build_job(params: &JobParams<'_>) -> Result<Job, serde_json::Error> {
    let change = params.change;
    let image = change.image().unwrap_or(params.default_image);
    let agent = AgentDef::lookup(&change.agent);
    let config = change.to_json()?;

    let mut init_containers = Vec::new();
    if let ForkPolicy::Fork { org } = params.fork {
        init_containers.push(stage(
            FORK_SETUP_STAGE,
            image,
            "sh",
            FORK_SETUP_SCRIPT,
            vec![
                env_var("ORIGINAL_REPO_URL", params.repo_url),
                env_var("FORK_ORG", org.as_deref().unwrap_or_default()),
                env_var("FORK_URL_FILE", FORK_URL_FILE),
            ],
        ));
    }

    let mut clone_env = vec![
        env_var("BRANCH", change.branch()),
        env_var("REPO_DIR", REPO_DIR),
        env_var("ORIGINAL_REPO_URL", params.repo_url),
    ];
    // Without a fork stage there is no artifact; the script clones the original.
    if matches!(params.fork, ForkPolicy::Fork { .. }) {
        clone_env.push(env_var("FORK_URL_FILE", FORK_URL_FILE));
    }
    init_containers.push(stage(GIT_CLONE_STAGE, image, "sh", GIT_CLONE_SCRIPT, clone_env));

    let mut runner = stage(
        RUNNER_STAGE,
        image,
        "bash",
        RUNNER_SCRIPT,
        vec![
            env_var("CONFIG", &config),
            env_var("REPO_URL", params.repo_url),
            env_var("ORIGINAL_REPO_URL", params.repo_url),
            env_var("PROMPT", &change.prompt),
            env_var("AGENT_COMMAND", &agent.command),
            env_var("REPO_DIR", REPO_DIR),
        ],
    );
    runner.working_dir = Some(REPO_DIR.to_string());

    let mut volumes = vec![Volume {
        name: WORKSPACE_VOLUME.to_string(),
        empty_dir: Some(EmptyDirVolumeSource::default()),
        ..Default::default()
    }];
    apply_delivery(agent.delivery, &mut runner, &mut volumes);

    let labels = job_labels(params.repo_url);
    Ok(Job {
        metadata: ObjectMeta {
            name: Some(derive_job_name(params.repo_url)),
            namespace: Some(params.namespace.to_string()),
            labels: Some(labels.clone()),
            ..Default::default()
        },
        spec: Some(JobSpec {
            ttl_seconds_after_finished: Some(params.ttl_secs),
            backoff_limit: Some(params.retries),
            template: PodTemplateSpec {
                metadata: Some(ObjectMeta { labels: Some(labels), ..Default::default() }),
                spec: Some(PodSpec {
                    init_containers: Some(init_containers),
                    containers: vec![runner],
                    volumes: Some(volumes),
                    restart_policy: Some("Never".to_string()),
                    ..Default::default()
                }),
            },
            ..Default::default()
        }),
        ..Default::default()
    })
}

/// Mount credential files into the main stage when the agent needs them.
///
/// The secret volume is optional so a bundle without the OAuth keys (API-key
/// auth) still schedules.
fn apply_delivery(delivery: CredentialDelivery, runner: &mut Container, volumes: &mut Vec<Volume>) {
    match delivery {
        CredentialDelivery::ApiKeyEnv => {}
        CredentialDelivery::OAuthFiles { mount_path, files } => {
            let items = files
                .iter()
                .map(|f| KeyToPath {
                    key: f.key.to_string(),
                    path: f.path.to_string(),
                    mode: Some(0o600),
                })
                .collect();
            volumes.push(Volume {
                name: OAUTH_VOLUME.to_string(),
                secret: Some(SecretVolumeSource {
                    secret_name: Some(CREDENTIALS_SECRET.to_string()),
                    items: Some(items),
                    optional: Some(true),
                    ..Default::default()
                }),
                ..Default::default()
            });
            runner.volume_mounts.get_or_insert_with(Vec::new).push(VolumeMount {
                name: OAUTH_VOLUME.to_string(),
                mount_path: mount_path.to_string(),
                read_only: Some(true),
                ..Default::default()
            });
        }
    }
}

fn stage(name: &str, image: &str, shell: &str, script: &str, env: Vec<EnvVar>) -> Container {
    Container {
        name: name.to_string(),
        image: Some(image.to_string()),
        image_pull_policy: Some(PULL_POLICY.to_string()),
        command: Some(vec![shell.to_string(), "-c".to_string(), script.to_string()]),
        env: Some(env),
        env_from: Some(vec![EnvFromSource {
            secret_ref: Some(SecretEnvSource {
                name: CREDENTIALS_SECRET.to_string(),
                optional: None,
            }),
            ..Default::default()
        }]),
        volume_mounts: Some(vec![VolumeMount {
            name: WORKSPACE_VOLUME.to_string(),
            mount_path: WORKSPACE_PATH.to_string(),
            ..Default::default()
        }]),
        ..Default::default()
    }
}

fn env_var(name: &str, value: &str) -> EnvVar {
    EnvVar { name: name.to_string(), value: Some(value.to_string()), ..Default::default() }
}

#[cfg(test)]
#[path = "job_tests.rs"]
mod tests;

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The slice of the cluster API the engine needs.
//!
//! Every operation is scoped to the target namespace the implementation was
//! constructed with. Create calls report [`ClusterError::AlreadyExists`]
//! distinctly so callers can fall through to get/update.

use async_trait::async_trait;
use bca_core::JobStatus;
use k8s_openapi::api::batch::v1::Job;
use k8s_openapi::api::core::v1::Secret;
use thiserror::Error;

/// Errors from cluster operations
#[derive(Debug, Error)]
pub enum ClusterError {
    #[error("{kind} {name} already exists")]
    AlreadyExists { kind: &'static str, name: String },
    /// Update rejected because the object changed since it was read
    #[error("{kind} {name} was modified concurrently")]
    Conflict { kind: &'static str, name: String },
    #[error("{kind} {name} not found")]
    NotFound { kind: &'static str, name: String },
    #[error("failed to configure cluster client: {0}")]
    Config(String),
    #[error("{kind} {name}: {message}")]
    Api { kind: &'static str, name: String, message: String },
}

impl ClusterError {
    pub fn is_already_exists(&self) -> bool {
        matches!(self, ClusterError::AlreadyExists { .. })
    }
}

/// Containers of the pod backing a job, in declared order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PodInfo {
    pub name: String,
    pub init_containers: Vec<String>,
    pub containers: Vec<String>,
}

impl PodInfo {
    /// Init containers first, then main containers, each tagged with whether it is an init stage.
    pub fn stages(&self) -> impl Iterator<Item = (&str, bool)> {
        self.init_containers
            .iter()
            .map(|c| (c.as_str(), true))
            .chain(self.containers.iter().map(|c| (c.as_str(), false)))
    }
}

/// Namespaced cluster operations used by provisioning and orchestration.
#[async_trait]
pub trait ClusterApi: Send + Sync {
    /// Target namespace for every namespaced operation.
    fn namespace(&self) -> &str;

    async fn create_namespace(&self) -> Result<(), ClusterError>;

    async fn get_namespace(&self) -> Result<(), ClusterError>;

    async fn create_secret(&self, secret: &Secret) -> Result<(), ClusterError>;

    async fn get_secret(&self, name: &str) -> Result<Secret, ClusterError>;

    /// Replace an existing secret with `secret` (matched by metadata name).
    async fn replace_secret(&self, secret: &Secret) -> Result<(), ClusterError>;

    async fn create_job(&self, job: &Job) -> Result<(), ClusterError>;

    /// Current status of a job, derived from its condition report.
    async fn job_status(&self, name: &str) -> Result<JobStatus, ClusterError>;

    /// Pods created for a job (selected by the scheduler's `job-name` label).
    async fn job_pods(&self, job_name: &str) -> Result<Vec<PodInfo>, ClusterError>;

    /// Stream one container's log, calling `sink` once per line.
    async fn stream_logs(
        &self,
        pod: &str,
        container: &str,
        sink: &mut (dyn for<'l> FnMut(&'l str) + Send),
    ) -> Result<(), ClusterError>;
}

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Apply a change: one Job per repository, then optionally watch them.

use std::time::Duration;

use bca_adapters::{build_job, ClusterApi, ForkPolicy, JobParams, DEFAULT_IMAGE, DEFAULT_TTL_SECS};
use bca_core::{Change, JobSummary};
use tokio_util::sync::CancellationToken;

use crate::diagnostics::{LogSink, StdoutSink};
use crate::error::ApplyError;
use crate::monitor::wait_for_jobs;

/// Engine settings fixed for the life of the process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    pub poll_interval: Duration,
    pub wait_timeout: Duration,
    /// Image for changes that do not name one
    pub default_image: String,
    pub ttl_secs: i32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(5),
            wait_timeout: Duration::from_secs(30 * 60),
            default_image: DEFAULT_IMAGE.to_string(),
            ttl_secs: DEFAULT_TTL_SECS,
        }
    }
}

impl EngineConfig {
    bca_core::setters! {
        into { default_image: String }
        set { poll_interval: Duration, wait_timeout: Duration, ttl_secs: i32 }
    }
}

/// Per-invocation options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplyOptions {
    pub wait: bool,
    /// Scheduler retries per job (`backoffLimit`)
    pub retries: i32,
    pub fork: ForkPolicy,
}

impl Default for ApplyOptions {
    fn default() -> Self {
        Self { wait: true, retries: 0, fork: ForkPolicy::default() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmittedJob {
    pub name: String,
    pub repo: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplyOutcome {
    /// In submission order
    pub jobs: Vec<SubmittedJob>,
    /// Present when the jobs were watched to completion
    pub summary: Option<JobSummary>,
}

/// Submits and watches jobs against one cluster namespace.
pub struct Orchestrator<C, S = StdoutSink> {
    cluster: C,
    config: EngineConfig,
    sink: S,
}

impl<C: ClusterApi> Orchestrator<C> {
    pub fn new(cluster: C, config: EngineConfig) -> Self {
        Self { cluster, config, sink: StdoutSink }
    }
}

impl<C: ClusterApi, S: LogSink> Orchestrator<C, S> {
    /// Replace the destination for job log passthrough.
    pub fn with_sink<T: LogSink>(self, sink: T) -> Orchestrator<C, T> {
        Orchestrator { cluster: self.cluster, config: self.config, sink }
    }

    pub fn cluster(&self) -> &C {
        &self.cluster
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Submit one job per repository in order, then wait if asked.
    ///
    /// A submission failure stops immediately; jobs already submitted are
    /// left running. Cancellation never retracts submitted jobs.
    pub async fn apply_change(
        &mut self,
        change: &Change,
        options: &ApplyOptions,
        cancel: &CancellationToken,
    ) -> Result<ApplyOutcome, ApplyError> {
        change.validate()?;
        let spec = &change.spec;
        let namespace = self.cluster.namespace().to_string();

        let mut jobs = Vec::with_capacity(spec.repos.len());
        for repo in &spec.repos {
            let job = build_job(&JobParams {
                change: spec,
                repo_url: repo,
                namespace: &namespace,
                default_image: &self.config.default_image,
                retries: options.retries,
                ttl_secs: self.config.ttl_secs,
                fork: &options.fork,
            })
            .map_err(|source| ApplyError::Build { repo: repo.clone(), source })?;
            let name = job.metadata.name.clone().unwrap_or_default();

            let submitted = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(ApplyError::Cancelled),
                r = self.cluster.create_job(&job) => r,
            };
            submitted.map_err(|source| ApplyError::Submit { repo: repo.clone(), source })?;

            tracing::info!(job = %name, %repo, %namespace, "submitted job");
            jobs.push(SubmittedJob { name, repo: repo.clone() });
        }

        if !options.wait {
            tracing::info!(jobs = jobs.len(), "jobs submitted, not waiting");
            return Ok(ApplyOutcome { jobs, summary: None });
        }

        let names: Vec<String> = jobs.iter().map(|j| j.name.clone()).collect();
        let summary = wait_for_jobs(
            &self.cluster,
            &names,
            self.config.poll_interval,
            self.config.wait_timeout,
            &mut self.sink,
            cancel,
        )
        .await?;
        Ok(ApplyOutcome { jobs, summary: Some(summary) })
    }
}

#[cfg(test)]
#[path = "apply_tests.rs"]
mod tests;

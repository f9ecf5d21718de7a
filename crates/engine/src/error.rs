// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Engine errors

use bca_adapters::ClusterError;
use bca_core::{ChangeError, JobSummary};
use thiserror::Error;

/// Errors from namespace and credential provisioning
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("failed to ensure namespace {namespace}: {source}")]
    Namespace {
        namespace: String,
        #[source]
        source: ClusterError,
    },
    #[error("failed to store credentials: {0}")]
    Secret(#[source] ClusterError),
}

/// Errors from applying a change
#[derive(Debug, Error)]
pub enum ApplyError {
    #[error(transparent)]
    InvalidChange(#[from] ChangeError),
    #[error("failed to build job for {repo}: {source}")]
    Build {
        repo: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to submit job for {repo}: {source}")]
    Submit {
        repo: String,
        #[source]
        source: ClusterError,
    },
    #[error("{} of {} jobs failed", failed_count(.summary), .summary.len())]
    JobsFailed { summary: JobSummary },
    #[error("timed out waiting for jobs to finish")]
    Timeout { summary: JobSummary },
    #[error("cancelled")]
    Cancelled,
}

impl ApplyError {
    /// Per-job statuses at the time the error was raised, when jobs were being watched.
    pub fn summary(&self) -> Option<&JobSummary> {
        match self {
            ApplyError::JobsFailed { summary } | ApplyError::Timeout { summary } => Some(summary),
            _ => None,
        }
    }
}

fn failed_count(summary: &JobSummary) -> usize {
    summary.values().filter(|s| **s == bca_core::JobStatus::Failed).count()
}

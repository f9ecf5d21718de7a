// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Adapters for the cluster scheduler: API access and Job spec construction

pub mod cluster;
pub mod k8s;

pub use cluster::{ClusterApi, ClusterError, PodInfo};
pub use k8s::{
    build_job, job_status, ClusterConfig, ForkPolicy, JobParams, KubeCluster,
    CREDENTIALS_SECRET, DEFAULT_IMAGE, DEFAULT_TTL_SECS,
};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{ClusterCall, FakeCluster};

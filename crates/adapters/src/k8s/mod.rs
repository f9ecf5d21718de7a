// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Kubernetes backend: Job spec construction and the live cluster client.
//!
//! # Module layout
//!
//! - [`job`]: Job spec construction and the stage scripts
//! - [`status`]: condition report → `JobStatus`
//! - [`client`]: `KubeCluster`, the `kube`-backed `ClusterApi`

mod client;
pub mod job;
mod status;

pub use client::{ClusterConfig, KubeCluster};
pub use job::{
    build_job, job_labels, ForkPolicy, JobParams, CREDENTIALS_SECRET, DEFAULT_IMAGE,
    DEFAULT_TTL_SECS,
};
pub use status::job_status;

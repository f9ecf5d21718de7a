// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI command implementations

use std::path::PathBuf;

use anyhow::{Context, Result};
use bca_adapters::KubeCluster;
use clap::Args;
use tokio_util::sync::CancellationToken;

use crate::config::Settings;
use crate::exit_error::ExitError;

pub mod apply;
pub mod k8s;

/// Cluster selection flags shared by every cluster command.
#[derive(Args, Debug, Clone, Default)]
pub struct ClusterFlags {
    /// Target namespace
    #[arg(long, short = 'n')]
    pub namespace: Option<String>,
    /// Path to a kubeconfig file
    #[arg(long)]
    pub kubeconfig: Option<PathBuf>,
    /// Kubeconfig context to use
    #[arg(long)]
    pub context: Option<String>,
}

impl ClusterFlags {
    pub fn apply_to(self, settings: &mut Settings) {
        settings.override_cluster(self.namespace, self.kubeconfig, self.context);
    }
}

/// Connect to the cluster named by `settings`, giving up on cancellation.
pub async fn connect(settings: &Settings, cancel: &CancellationToken) -> Result<KubeCluster> {
    let config = settings.cluster_config();
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(ExitError::cancelled().into()),
        r = KubeCluster::connect(&config) => {
            r.context("failed to connect to cluster")
        }
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;

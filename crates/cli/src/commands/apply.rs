// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `bca apply`: submit a change to every repository it names

use std::path::PathBuf;

use anyhow::Result;
use bca_adapters::ForkPolicy;
use bca_core::{AgentDef, Change};
use bca_engine::{ApplyError, ApplyOptions, Orchestrator};
use clap::Args;
use tokio_util::sync::CancellationToken;

use super::{connect, ClusterFlags};
use crate::config::Settings;
use crate::exit_error::ExitError;
use crate::output::{format_submitted, print_summary};

#[derive(Args, Debug)]
pub struct ApplyArgs {
    /// Change definition file (YAML)
    pub change_file: PathBuf,

    #[command(flatten)]
    pub cluster: ClusterFlags,

    /// Return after submitting instead of waiting for jobs to finish
    #[arg(long)]
    pub no_wait: bool,

    /// Scheduler retries per failed job (backoffLimit)
    #[arg(long, default_value_t = 0, value_parser = clap::value_parser!(i32).range(0..))]
    pub retries: i32,

    /// Organization to fork into (default: the token's user)
    #[arg(long, conflicts_with = "no_fork")]
    pub fork_org: Option<String>,

    /// Work on the original repositories instead of forks
    #[arg(long)]
    pub no_fork: bool,
}

impl ApplyArgs {
    pub fn options(&self) -> ApplyOptions {
        let fork = if self.no_fork {
            ForkPolicy::Direct
        } else {
            ForkPolicy::Fork { org: self.fork_org.clone().filter(|o| !o.is_empty()) }
        };
        ApplyOptions { wait: !self.no_wait, retries: self.retries, fork }
    }
}

pub async fn handle(
    args: ApplyArgs,
    mut settings: Settings,
    cancel: &CancellationToken,
) -> Result<()> {
    let change = Change::load(&args.change_file)?;
    if !AgentDef::is_known(&change.spec.agent) {
        tracing::warn!(
            agent = %change.spec.agent,
            "unknown agent, the runner image must provide a command of the same name"
        );
    }

    let options = args.options();
    args.cluster.apply_to(&mut settings);
    let cluster = connect(&settings, cancel).await?;
    let mut orchestrator = Orchestrator::new(cluster, settings.engine_config());

    match orchestrator.apply_change(&change, &options, cancel).await {
        Ok(outcome) => {
            match outcome.summary {
                Some(summary) => print_summary(&summary),
                None => print!("{}", format_submitted(&outcome.jobs)),
            }
            Ok(())
        }
        Err(err) => {
            if let Some(summary) = err.summary() {
                print_summary(summary);
            }
            Err(into_exit(err))
        }
    }
}

/// Map engine outcomes onto process exit codes.
pub(crate) fn into_exit(err: ApplyError) -> anyhow::Error {
    match err {
        ApplyError::Cancelled => ExitError::cancelled().into(),
        ApplyError::JobsFailed { .. } | ApplyError::Timeout { .. } => {
            ExitError::new(1, err.to_string()).into()
        }
        other => anyhow::Error::new(other),
    }
}

#[cfg(test)]
#[path = "apply_tests.rs"]
mod tests;

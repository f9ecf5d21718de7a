// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `bca k8s`: cluster preparation and job status queries

use std::path::Path;

use anyhow::{Context, Result};
use bca_adapters::{ClusterApi, CREDENTIALS_SECRET};
use bca_core::credentials::COPILOT_TOKEN;
use bca_core::{CredentialBundle, JobSummary};
use bca_engine::setup;
use clap::{Args, Subcommand};
use tokio_util::sync::CancellationToken;

use super::{connect, ClusterFlags};
use crate::config::Settings;
use crate::env;
use crate::exit_error::ExitError;
use crate::output::print_summary;

#[derive(Args, Debug)]
pub struct K8sArgs {
    #[command(subcommand)]
    pub command: K8sCommand,
}

#[derive(Subcommand, Debug)]
pub enum K8sCommand {
    /// Create the namespace and store agent credentials in it
    Setup(SetupArgs),
    /// Show the current status of jobs
    Status {
        /// Job names
        #[arg(required = true)]
        jobs: Vec<String>,

        #[command(flatten)]
        cluster: ClusterFlags,
    },
}

#[derive(Args, Debug, Default)]
pub struct SetupArgs {
    #[command(flatten)]
    pub cluster: ClusterFlags,

    /// GitHub token for cloning, forking and pushing (default: $GITHUB_TOKEN)
    #[arg(long)]
    pub github_token: Option<String>,

    /// Copilot token (default: $COPILOT_TOKEN)
    #[arg(long)]
    pub copilot_token: Option<String>,

    /// Gemini API key (default: $GEMINI_API_KEY)
    #[arg(long, conflicts_with = "gemini_oauth")]
    pub gemini_api_key: Option<String>,

    /// Store the gemini OAuth files from ~/.gemini instead of an API key
    #[arg(long)]
    pub gemini_oauth: bool,
}

impl SetupArgs {
    /// Collect credentials from flags, falling back to the environment.
    pub fn bundle(&self, home: Option<&Path>) -> Result<CredentialBundle> {
        let github = self.github_token.clone().or_else(env::github_token).unwrap_or_default();
        let mut bundle = CredentialBundle::with_github_token(&github)?;

        let copilot = self.copilot_token.clone().or_else(env::copilot_token);
        bundle.insert_opt(COPILOT_TOKEN, copilot.as_deref());

        let api_key = match (&self.gemini_api_key, self.gemini_oauth) {
            (Some(key), _) => Some(key.clone()),
            (None, false) => env::gemini_api_key(),
            (None, true) => None,
        };
        let oauth_dir = if self.gemini_oauth {
            let home = home.context("cannot locate home directory for gemini OAuth files")?;
            Some(home.join(".gemini"))
        } else {
            None
        };
        bundle.add_gemini(api_key.as_deref(), oauth_dir.as_deref())?;
        Ok(bundle)
    }
}

pub async fn handle(args: K8sArgs, settings: Settings, cancel: &CancellationToken) -> Result<()> {
    match args.command {
        K8sCommand::Setup(setup_args) => handle_setup(setup_args, settings, cancel).await,
        K8sCommand::Status { jobs, cluster } => {
            handle_status(jobs, cluster, settings, cancel).await
        }
    }
}

async fn handle_setup(
    args: SetupArgs,
    mut settings: Settings,
    cancel: &CancellationToken,
) -> Result<()> {
    let bundle = args.bundle(dirs::home_dir().as_deref())?;
    args.cluster.apply_to(&mut settings);
    let cluster = connect(&settings, cancel).await?;

    tokio::select! {
        biased;
        _ = cancel.cancelled() => return Err(ExitError::cancelled().into()),
        r = setup(&cluster, &bundle) => r?,
    }

    println!("namespace/{} ready", cluster.namespace());
    let keys: Vec<&str> = bundle.keys().collect();
    println!("secret/{} stored: {}", CREDENTIALS_SECRET, keys.join(", "));
    Ok(())
}

async fn handle_status(
    jobs: Vec<String>,
    flags: ClusterFlags,
    mut settings: Settings,
    cancel: &CancellationToken,
) -> Result<()> {
    flags.apply_to(&mut settings);
    let cluster = connect(&settings, cancel).await?;

    let (summary, failures) = tokio::select! {
        biased;
        _ = cancel.cancelled() => return Err(ExitError::cancelled().into()),
        r = query_statuses(&cluster, &jobs) => r,
    };

    if !summary.is_empty() {
        print_summary(&summary);
    }
    if failures > 0 {
        return Err(ExitError::new(1, format!("{failures} of {} job lookups failed", jobs.len()))
            .into());
    }
    Ok(())
}

/// Look up each job once. Lookup failures are logged and counted, not fatal.
pub(crate) async fn query_statuses<C: ClusterApi>(
    cluster: &C,
    jobs: &[String],
) -> (JobSummary, usize) {
    let mut summary = JobSummary::new();
    let mut failures = 0;
    for job in jobs {
        match cluster.job_status(job).await {
            Ok(status) => {
                summary.insert(job.clone(), status);
            }
            Err(e) => {
                tracing::error!(%job, error = %e, "failed to get job status");
                failures += 1;
            }
        }
    }
    (summary, failures)
}

#[cfg(test)]
#[path = "k8s_tests.rs"]
mod tests;

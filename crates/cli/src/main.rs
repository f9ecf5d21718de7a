// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! bca: dispatch a coding agent across repositories as Kubernetes Jobs

mod color;
mod commands;
mod config;
mod env;
mod exit_error;
mod logging;
mod output;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;

use crate::commands::{apply, k8s};
use crate::config::Settings;
use crate::exit_error::ExitError;

const VERSION: &str =
    concat!(env!("CARGO_PKG_VERSION"), " (", env!("BCA_BUILD_REVISION"), ")");

#[derive(Parser, Debug)]
#[command(name = "bca", version = VERSION, about = "Batch coding-agent dispatch on Kubernetes")]
#[command(styles = color::styles())]
struct Cli {
    /// Config file (default: $BCA_CONFIG or <config dir>/bca/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log level when RUST_LOG is unset (error, warn, info, debug, trace)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Submit one job per repository in a change file
    Apply(apply::ApplyArgs),
    /// Prepare a cluster and inspect jobs
    K8s(k8s::K8sArgs),
}

fn main() {
    if let Err(err) = run() {
        let code = match err.downcast_ref::<ExitError>() {
            Some(exit) => exit.code,
            None => 1,
        };
        eprintln!("error: {err:#}");
        std::process::exit(code);
    }
}

#[tokio::main]
async fn run() -> Result<()> {
    let cli = Cli::parse();

    let mut settings = Settings::load(cli.config.as_deref())?;
    if let Some(level) = cli.log_level {
        settings.log_level = level;
    }
    logging::init(&settings.log_level)?;

    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("interrupted, submitted jobs keep running");
            trigger.cancel();
        }
    });

    match cli.command {
        Command::Apply(args) => apply::handle(args, settings, &cancel).await,
        Command::K8s(args) => k8s::handle(args, settings, &cancel).await,
    }
}

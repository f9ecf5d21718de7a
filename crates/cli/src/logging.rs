// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Structured logs go to stderr so stdout stays free for job log passthrough
//! and the summary table.

use anyhow::{Context, Result};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Build the filter: `rust_log` (from `RUST_LOG`) wins, else a single `level`.
pub fn filter(rust_log: Option<&str>, level: &str) -> Result<EnvFilter> {
    if let Some(directives) = rust_log {
        return EnvFilter::try_new(directives).context("invalid RUST_LOG");
    }
    let level: LevelFilter =
        level.parse().with_context(|| format!("invalid log level '{}'", level))?;
    Ok(EnvFilter::default().add_directive(level.into()))
}

/// Install the global subscriber. A second call is a no-op.
pub fn init(level: &str) -> Result<()> {
    let filter = filter(crate::env::rust_log().as_deref(), level)?;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
    Ok(())
}

#[cfg(test)]
#[path = "logging_tests.rs"]
mod tests;

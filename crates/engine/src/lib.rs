// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Job orchestration: credential provisioning, submission, and monitoring

mod apply;
mod diagnostics;
mod error;
mod monitor;
mod provision;

pub use apply::{ApplyOptions, ApplyOutcome, EngineConfig, Orchestrator, SubmittedJob};
pub use diagnostics::{emit_logs, LogSink, StdoutSink};
pub use error::{ApplyError, SetupError};
pub use monitor::{wait_for_jobs, MIN_POLL_INTERVAL};
pub use provision::setup;

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the CLI.

use std::path::PathBuf;
use std::time::Duration;

fn non_empty(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|s| !s.is_empty())
}

fn millis(name: &str) -> Option<Duration> {
    std::env::var(name).ok().and_then(|s| s.parse::<u64>().ok()).map(Duration::from_millis)
}

/// Config file override: BCA_CONFIG
pub fn config_path() -> Option<PathBuf> {
    non_empty("BCA_CONFIG").map(PathBuf::from)
}

pub fn namespace() -> Option<String> {
    non_empty("BCA_NAMESPACE")
}

pub fn kubeconfig() -> Option<PathBuf> {
    non_empty("BCA_KUBECONFIG").map(PathBuf::from)
}

pub fn context() -> Option<String> {
    non_empty("BCA_CONTEXT")
}

/// Default runner image for changes that do not name one
pub fn image() -> Option<String> {
    non_empty("BCA_IMAGE")
}

pub fn log_level() -> Option<String> {
    non_empty("BCA_LOG_LEVEL")
}

/// Standard tracing filter; overrides every other log level source
pub fn rust_log() -> Option<String> {
    non_empty("RUST_LOG")
}

/// Status poll interval override (milliseconds)
pub fn poll_interval() -> Option<Duration> {
    millis("BCA_POLL_INTERVAL_MS")
}

/// Wait timeout override (milliseconds)
pub fn wait_timeout() -> Option<Duration> {
    millis("BCA_WAIT_TIMEOUT_MS")
}

pub fn github_token() -> Option<String> {
    non_empty("GITHUB_TOKEN")
}

pub fn copilot_token() -> Option<String> {
    non_empty("COPILOT_TOKEN")
}

pub fn gemini_api_key() -> Option<String> {
    non_empty("GEMINI_API_KEY")
}

/// `NO_COLOR=1` disables color
pub fn no_color() -> bool {
    std::env::var("NO_COLOR").is_ok_and(|v| v == "1")
}

/// `COLOR=1` forces color
pub fn force_color() -> bool {
    std::env::var("COLOR").is_ok_and(|v| v == "1")
}

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Layered settings: CLI flag > `BCA_*` environment > TOML file > defaults.
//!
//! ```toml
//! namespace = "agents"
//! kubeconfig = "/home/me/.kube/work"
//! context = "prod"
//! image = "ghcr.io/acme/runner:1.4"
//! log_level = "debug"
//!
//! [monitor]
//! poll_interval_secs = 5
//! wait_timeout_secs = 1800
//!
//! [job]
//! ttl_secs = 300
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use bca_adapters::{ClusterConfig, DEFAULT_IMAGE, DEFAULT_TTL_SECS};
use bca_engine::EngineConfig;
use serde::Deserialize;
use thiserror::Error;

use crate::env;

pub const DEFAULT_NAMESPACE: &str = "default";
pub const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid setting {key}: {reason}")]
    Invalid { key: &'static str, reason: &'static str },
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct FileConfig {
    namespace: Option<String>,
    kubeconfig: Option<PathBuf>,
    context: Option<String>,
    image: Option<String>,
    log_level: Option<String>,
    monitor: MonitorSection,
    job: JobSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct MonitorSection {
    poll_interval_secs: Option<u64>,
    wait_timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct JobSection {
    ttl_secs: Option<i32>,
}

/// Resolved settings for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub namespace: String,
    pub kubeconfig: Option<PathBuf>,
    pub context: Option<String>,
    pub image: String,
    pub log_level: String,
    pub poll_interval: Duration,
    pub wait_timeout: Duration,
    pub ttl_secs: i32,
}

impl Default for Settings {
    fn default() -> Self {
        let engine = EngineConfig::default();
        Self {
            namespace: DEFAULT_NAMESPACE.to_string(),
            kubeconfig: None,
            context: None,
            image: DEFAULT_IMAGE.to_string(),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            poll_interval: engine.poll_interval,
            wait_timeout: engine.wait_timeout,
            ttl_secs: DEFAULT_TTL_SECS,
        }
    }
}

impl Settings {
    /// Load the config file and apply environment overrides.
    ///
    /// `explicit` (from `--config`) must exist. Otherwise `BCA_CONFIG`, then
    /// `<config_dir>/bca/config.toml`; a missing default file is not an error.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let (path, required) = match explicit.map(Path::to_path_buf).or_else(env::config_path) {
            Some(path) => (Some(path), true),
            None => (default_path(), false),
        };

        let mut settings = Self::default();
        if let Some(path) = path {
            if let Some(file) = read_file(&path, required)? {
                settings.apply_file(file);
            }
        }
        settings.apply_env();
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.poll_interval.is_zero() {
            return Err(ConfigError::Invalid {
                key: "poll interval",
                reason: "must be greater than zero",
            });
        }
        Ok(())
    }

    fn apply_file(&mut self, file: FileConfig) {
        if let Some(v) = file.namespace {
            self.namespace = v;
        }
        if file.kubeconfig.is_some() {
            self.kubeconfig = file.kubeconfig;
        }
        if file.context.is_some() {
            self.context = file.context;
        }
        if let Some(v) = file.image {
            self.image = v;
        }
        if let Some(v) = file.log_level {
            self.log_level = v;
        }
        if let Some(secs) = file.monitor.poll_interval_secs {
            self.poll_interval = Duration::from_secs(secs);
        }
        if let Some(secs) = file.monitor.wait_timeout_secs {
            self.wait_timeout = Duration::from_secs(secs);
        }
        if let Some(v) = file.job.ttl_secs {
            self.ttl_secs = v;
        }
    }

    fn apply_env(&mut self) {
        if let Some(v) = env::namespace() {
            self.namespace = v;
        }
        if let Some(v) = env::kubeconfig() {
            self.kubeconfig = Some(v);
        }
        if let Some(v) = env::context() {
            self.context = Some(v);
        }
        if let Some(v) = env::image() {
            self.image = v;
        }
        if let Some(v) = env::log_level() {
            self.log_level = v;
        }
        if let Some(v) = env::poll_interval() {
            self.poll_interval = v;
        }
        if let Some(v) = env::wait_timeout() {
            self.wait_timeout = v;
        }
    }

    /// Apply cluster selection flags; `None` keeps the lower layers.
    pub fn override_cluster(
        &mut self,
        namespace: Option<String>,
        kubeconfig: Option<PathBuf>,
        context: Option<String>,
    ) {
        if let Some(v) = namespace {
            self.namespace = v;
        }
        if kubeconfig.is_some() {
            self.kubeconfig = kubeconfig;
        }
        if context.is_some() {
            self.context = context;
        }
    }

    pub fn cluster_config(&self) -> ClusterConfig {
        ClusterConfig {
            kubeconfig: self.kubeconfig.clone(),
            context: self.context.clone(),
            namespace: self.namespace.clone(),
        }
    }

    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig::default()
            .poll_interval(self.poll_interval)
            .wait_timeout(self.wait_timeout)
            .default_image(self.image.clone())
            .ttl_secs(self.ttl_secs)
    }
}

fn default_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("bca").join("config.toml"))
}

fn read_file(path: &Path, required: bool) -> Result<Option<FileConfig>, ConfigError> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound && !required => {
            tracing::trace!(path = %path.display(), "no config file");
            return Ok(None);
        }
        Err(source) => {
            return Err(ConfigError::Read { path: path.display().to_string(), source });
        }
    };
    toml::from_str(&content)
        .map(Some)
        .map_err(|source| ConfigError::Parse { path: path.display().to_string(), source })
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;

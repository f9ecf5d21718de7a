// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Change definitions: the declarative description of one batch transformation.
//!
//! A change file is a small YAML document:
//!
//! ```yaml
//! kind: Change
//! apiVersion: v1
//! spec:
//!   agent: copilot-cli
//!   prompt: Add error handling to the HTTP client
//!   repos:
//!     - https://github.com/example/service-a
//!   resources:
//!     - https://example.com/docs/errors.md
//!   agentsmd: https://example.com/agents.md
//!   branch: main
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Branch cloned when a change does not name one.
pub const DEFAULT_BRANCH: &str = "main";

/// Errors from loading or validating a change file
#[derive(Debug, Error)]
pub enum ChangeError {
    #[error("failed to read change file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse change file: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("invalid change definition: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Change {
    #[serde(default)]
    pub kind: String,
    #[serde(default, rename = "apiVersion")]
    pub api_version: String,
    pub spec: ChangeSpec,
}

/// The part of a change that execution units consume.
///
/// Serialized to JSON and handed to the in-unit executor verbatim, so field
/// names here are part of the unit contract.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeSpec {
    pub agent: String,
    pub prompt: String,
    #[serde(default)]
    pub repos: Vec<String>,
    #[serde(default)]
    pub resources: Vec<String>,
    #[serde(default, rename = "agentsmd", skip_serializing_if = "Option::is_none")]
    pub agents_md: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
}

impl Change {
    /// Wrap a spec in a `kind: Change` envelope.
    pub fn new(spec: ChangeSpec) -> Self {
        Self { kind: "Change".to_string(), api_version: "v1".to_string(), spec }
    }

    /// Read, parse, and validate a change file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ChangeError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ChangeError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&content)
    }

    /// Parse and validate a change from YAML text.
    pub fn parse(content: &str) -> Result<Self, ChangeError> {
        let change: Change = serde_yaml::from_str(content)?;
        change.validate()?;
        Ok(change)
    }

    pub fn validate(&self) -> Result<(), ChangeError> {
        if self.kind != "Change" {
            return Err(ChangeError::Invalid(format!(
                "kind must be 'Change', got '{}'",
                self.kind
            )));
        }
        if self.spec.prompt.trim().is_empty() {
            return Err(ChangeError::Invalid("spec.prompt is required".to_string()));
        }
        if self.spec.repos.is_empty() {
            return Err(ChangeError::Invalid(
                "spec.repos must contain at least one repository".to_string(),
            ));
        }
        if self.spec.agent.trim().is_empty() {
            return Err(ChangeError::Invalid("spec.agent is required".to_string()));
        }
        Ok(())
    }
}

impl ChangeSpec {
    /// Branch to clone, falling back to [`DEFAULT_BRANCH`].
    pub fn branch(&self) -> &str {
        self.branch.as_deref().filter(|b| !b.is_empty()).unwrap_or(DEFAULT_BRANCH)
    }

    /// Image requested by the change, if any.
    pub fn image(&self) -> Option<&str> {
        self.image.as_deref().filter(|i| !i.is_empty())
    }

    /// JSON form handed to the main stage as `CONFIG`.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
#[path = "change_tests.rs"]
mod tests;

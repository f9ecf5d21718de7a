// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The credential bundle shared by every execution unit in a namespace.
//!
//! Keys are an external contract with the stage scripts, which read them as
//! environment variables:
//!
//! ```text
//! GITHUB_TOKEN    fork, clone, push, pull request (required)
//! COPILOT_TOKEN   copilot-cli, falls back to GITHUB_TOKEN
//! GEMINI_API_KEY  gemini-cli API-key auth
//! GEMINI_*        gemini-cli OAuth files, mounted under /root/.gemini
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use thiserror::Error;

use crate::agent::GEMINI_OAUTH_FILES;

pub const GITHUB_TOKEN: &str = "GITHUB_TOKEN";
pub const COPILOT_TOKEN: &str = "COPILOT_TOKEN";
pub const GEMINI_API_KEY: &str = "GEMINI_API_KEY";

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("github token is required: use --github-token or the GITHUB_TOKEN env var")]
    MissingGithubToken,
    #[error("choose either an API key or OAuth authentication for gemini-cli, not both")]
    ConflictingGeminiAuth,
    #[error("failed to read {path}: {source} (ensure gemini-cli is authenticated)")]
    GeminiFile {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Credential key → secret value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CredentialBundle {
    entries: BTreeMap<String, String>,
}

impl CredentialBundle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a bundle from the required git token.
    pub fn with_github_token(token: &str) -> Result<Self, CredentialError> {
        if token.is_empty() {
            return Err(CredentialError::MissingGithubToken);
        }
        let mut bundle = Self::new();
        bundle.insert(GITHUB_TOKEN, token);
        Ok(bundle)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    /// Insert only when `value` is present and non-empty. Returns whether it was inserted.
    pub fn insert_opt(&mut self, key: &str, value: Option<&str>) -> bool {
        match value.filter(|v| !v.is_empty()) {
            Some(v) => {
                self.insert(key, v);
                true
            }
            None => false,
        }
    }

    /// Add gemini credentials: either an API key or the OAuth files in `oauth_dir`.
    pub fn add_gemini(
        &mut self,
        api_key: Option<&str>,
        oauth_dir: Option<&Path>,
    ) -> Result<(), CredentialError> {
        let api_key = api_key.filter(|k| !k.is_empty());
        match (api_key, oauth_dir) {
            (Some(_), Some(_)) => Err(CredentialError::ConflictingGeminiAuth),
            (Some(key), None) => {
                self.insert(GEMINI_API_KEY, key);
                Ok(())
            }
            (None, Some(dir)) => {
                for file in GEMINI_OAUTH_FILES {
                    let path = dir.join(file.path);
                    let content = std::fs::read_to_string(&path).map_err(|source| {
                        CredentialError::GeminiFile { path: path.display().to_string(), source }
                    })?;
                    self.insert(file.key, content);
                }
                Ok(())
            }
            (None, None) => Ok(()),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for CredentialBundle {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self { entries: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect() }
    }
}

#[cfg(test)]
#[path = "credentials_tests.rs"]
mod tests;

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Coding agents known to the runner image and how they receive credentials.
//!
//! ```text
//! gemini-cli   → `gemini`   OAuthFiles (or GEMINI_API_KEY from the env)
//! copilot-cli  → `copilot`  ApiKeyEnv  (COPILOT_TOKEN, else GITHUB_TOKEN)
//! <other>      → `<other>`  ApiKeyEnv
//! ```

/// How an agent's credentials reach the main stage.
///
/// Every stage already receives the whole credential bundle as environment
/// variables; `OAuthFiles` additionally mounts selected bundle keys as files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialDelivery {
    /// Tokens are read from the environment only.
    ApiKeyEnv,
    /// Bundle keys are mounted read-only as files under `mount_path`.
    OAuthFiles { mount_path: &'static str, files: &'static [OAuthFile] },
}

/// One bundle key projected to a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OAuthFile {
    /// Key in the credential bundle
    pub key: &'static str,
    /// File name under the mount path
    pub path: &'static str,
}

/// Gemini CLI state copied from `~/.gemini/` by `setup --gemini-oauth`.
pub const GEMINI_OAUTH_FILES: &[OAuthFile] = &[
    OAuthFile { key: "GEMINI_oauth_creds.json", path: "oauth_creds.json" },
    OAuthFile { key: "GEMINI_google_accounts.json", path: "google_accounts.json" },
    OAuthFile { key: "GEMINI_installation_id", path: "installation_id" },
    OAuthFile { key: "GEMINI_settings.json", path: "settings.json" },
];

/// Static description of a coding agent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentDef {
    pub name: String,
    /// Executable invoked by the runner
    pub command: String,
    pub delivery: CredentialDelivery,
}

const KNOWN_AGENTS: &[(&str, &str, CredentialDelivery)] = &[
    (
        "gemini-cli",
        "gemini",
        CredentialDelivery::OAuthFiles { mount_path: "/root/.gemini", files: GEMINI_OAUTH_FILES },
    ),
    ("copilot-cli", "copilot", CredentialDelivery::ApiKeyEnv),
];

impl AgentDef {
    /// Look up an agent by name; unknown agents run their name as the command.
    pub fn lookup(name: &str) -> Self {
        match KNOWN_AGENTS.iter().find(|(n, _, _)| *n == name) {
            Some((n, command, delivery)) => {
                Self { name: n.to_string(), command: command.to_string(), delivery: *delivery }
            }
            None => Self {
                name: name.to_string(),
                command: name.to_string(),
                delivery: CredentialDelivery::ApiKeyEnv,
            },
        }
    }

    /// Whether this agent is one the runner image ships.
    pub fn is_known(name: &str) -> bool {
        KNOWN_AGENTS.iter().any(|(n, _, _)| *n == name)
    }
}

#[cfg(test)]
#[path = "agent_tests.rs"]
mod tests;

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[yare::parameterized(
    gemini  = { "gemini-cli",  "gemini" },
    copilot = { "copilot-cli", "copilot" },
    unknown = { "aider",       "aider" },
)]
fn lookup_resolves_command(name: &str, command: &str) {
    let def = AgentDef::lookup(name);
    assert_eq!(def.name, name);
    assert_eq!(def.command, command);
}

#[test]
fn gemini_uses_oauth_files() {
    let def = AgentDef::lookup("gemini-cli");
    let CredentialDelivery::OAuthFiles { mount_path, files } = def.delivery else {
        panic!("expected OAuthFiles, got {:?}", def.delivery);
    };
    assert_eq!(mount_path, "/root/.gemini");
    let keys: Vec<&str> = files.iter().map(|f| f.key).collect();
    assert_eq!(
        keys,
        vec![
            "GEMINI_oauth_creds.json",
            "GEMINI_google_accounts.json",
            "GEMINI_installation_id",
            "GEMINI_settings.json",
        ]
    );
    for file in files {
        assert_eq!(file.key.strip_prefix("GEMINI_"), Some(file.path));
    }
}

#[yare::parameterized(
    copilot = { "copilot-cli" },
    unknown = { "some-new-agent" },
)]
fn other_agents_use_env_only(name: &str) {
    assert_eq!(AgentDef::lookup(name).delivery, CredentialDelivery::ApiKeyEnv);
}

#[test]
fn known_agents() {
    assert!(AgentDef::is_known("gemini-cli"));
    assert!(AgentDef::is_known("copilot-cli"));
    assert!(!AgentDef::is_known("aider"));
}

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use bca_adapters::{ClusterCall, ClusterError, FakeCluster};

fn bundle(pairs: &[(&str, &str)]) -> CredentialBundle {
    pairs.iter().copied().collect()
}

#[tokio::test]
async fn creates_namespace_and_secret() {
    let fake = FakeCluster::new("agents");
    setup(&fake, &bundle(&[("GITHUB_TOKEN", "ghp_1")])).await.unwrap();

    assert!(fake.namespace_exists());
    let secret = fake.secret(CREDENTIALS_SECRET).unwrap();
    assert_eq!(secret.type_.as_deref(), Some("Opaque"));
    assert_eq!(secret.metadata.namespace.as_deref(), Some("agents"));
    assert_eq!(fake.secret_data(CREDENTIALS_SECRET)["GITHUB_TOKEN"], "ghp_1");
}

#[tokio::test]
async fn existing_namespace_is_fetched() {
    let fake = FakeCluster::new("agents").with_namespace();
    setup(&fake, &bundle(&[("GITHUB_TOKEN", "ghp_1")])).await.unwrap();
    assert_eq!(fake.count(|c| *c == ClusterCall::GetNamespace), 1);
}

#[tokio::test]
async fn second_setup_merges_keys() {
    let fake = FakeCluster::new("agents");
    setup(&fake, &bundle(&[("GITHUB_TOKEN", "ghp_1"), ("COPILOT_TOKEN", "cop_1")]))
        .await
        .unwrap();
    setup(&fake, &bundle(&[("GITHUB_TOKEN", "ghp_2"), ("GEMINI_API_KEY", "gem")]))
        .await
        .unwrap();

    let data = fake.secret_data(CREDENTIALS_SECRET);
    assert_eq!(data.len(), 3);
    assert_eq!(data["GITHUB_TOKEN"], "ghp_2");
    assert_eq!(data["COPILOT_TOKEN"], "cop_1");
    assert_eq!(data["GEMINI_API_KEY"], "gem");
    assert_eq!(
        fake.count(|c| matches!(c, ClusterCall::ReplaceSecret(n) if n == CREDENTIALS_SECRET)),
        1
    );
}

#[tokio::test]
async fn namespace_failure_is_fatal() {
    let fake = FakeCluster::new("agents");
    fake.fail_namespace_creation();
    let err = setup(&fake, &bundle(&[("GITHUB_TOKEN", "ghp_1")])).await.unwrap_err();
    assert!(matches!(err, SetupError::Namespace { ref namespace, .. } if namespace == "agents"));
    assert!(fake.secret(CREDENTIALS_SECRET).is_none());
}

#[tokio::test]
async fn namespace_lookup_failure_is_fatal() {
    let fake = FakeCluster::new("agents").with_namespace();
    fake.fail_namespace_lookup();
    let err = setup(&fake, &bundle(&[("GITHUB_TOKEN", "ghp_1")])).await.unwrap_err();
    assert!(matches!(err, SetupError::Namespace { .. }), "{err}");
    assert_eq!(fake.count(|c| matches!(c, ClusterCall::CreateSecret(_))), 0);
}

#[tokio::test]
async fn secret_creation_failure_is_fatal() {
    let fake = FakeCluster::new("agents");
    fake.fail_secret_creation();
    let err = setup(&fake, &bundle(&[("GITHUB_TOKEN", "ghp_1")])).await.unwrap_err();

    let SetupError::Secret(source) = &err else { panic!("expected secret error, got {err:?}") };
    assert!(!source.is_already_exists());
    assert!(fake.secret(CREDENTIALS_SECRET).is_none());
    assert_eq!(fake.count(|c| matches!(c, ClusterCall::ReplaceSecret(_))), 0);
}

#[tokio::test]
async fn failed_update_keeps_stored_credentials() {
    let fake = FakeCluster::new("agents");
    setup(&fake, &bundle(&[("GITHUB_TOKEN", "ghp_1")])).await.unwrap();
    fake.fail_secret_replace();

    let err = setup(&fake, &bundle(&[("GITHUB_TOKEN", "ghp_2"), ("COPILOT_TOKEN", "cop")]))
        .await
        .unwrap_err();

    assert!(matches!(err, SetupError::Secret(ClusterError::Conflict { .. })), "{err}");
    let data = fake.secret_data(CREDENTIALS_SECRET);
    assert_eq!(data.len(), 1);
    assert_eq!(data["GITHUB_TOKEN"], "ghp_1");
}

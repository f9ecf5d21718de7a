// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Namespace and credential provisioning.
//!
//! Idempotent: a second `setup` merges its keys over the stored bundle, and
//! keys it omits keep their previous values. Two concurrent calls racing on
//! create both succeed; the loser falls through to update.

use std::collections::BTreeMap;

use bca_adapters::{ClusterApi, CREDENTIALS_SECRET};
use bca_core::CredentialBundle;
use k8s_openapi::api::core::v1::Secret;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use k8s_openapi::ByteString;

use crate::error::SetupError;

/// Ensure the target namespace exists and holds `bundle` in the credentials secret.
pub async fn setup<C>(cluster: &C, bundle: &CredentialBundle) -> Result<(), SetupError>
where
    C: ClusterApi + ?Sized,
{
    ensure_namespace(cluster).await?;
    store_credentials(cluster, bundle).await
}

async fn ensure_namespace<C: ClusterApi + ?Sized>(cluster: &C) -> Result<(), SetupError> {
    let namespace = cluster.namespace();
    let wrap = |source| SetupError::Namespace { namespace: namespace.to_string(), source };

    match cluster.create_namespace().await {
        Ok(()) => {
            tracing::info!(%namespace, "created namespace");
            Ok(())
        }
        Err(e) if e.is_already_exists() => {
            cluster.get_namespace().await.map_err(wrap)?;
            tracing::debug!(%namespace, "namespace already exists");
            Ok(())
        }
        Err(e) => Err(wrap(e)),
    }
}

async fn store_credentials<C: ClusterApi + ?Sized>(
    cluster: &C,
    bundle: &CredentialBundle,
) -> Result<(), SetupError> {
    let secret = credentials_secret(cluster.namespace(), bundle);
    match cluster.create_secret(&secret).await {
        Ok(()) => {
            tracing::info!(secret = CREDENTIALS_SECRET, keys = bundle.len(), "created credentials");
            Ok(())
        }
        Err(e) if e.is_already_exists() => {
            let mut existing =
                cluster.get_secret(CREDENTIALS_SECRET).await.map_err(SetupError::Secret)?;
            let data = existing.data.get_or_insert_with(BTreeMap::new);
            for (key, value) in bundle.iter() {
                data.insert(key.to_string(), ByteString(value.as_bytes().to_vec()));
            }
            cluster.replace_secret(&existing).await.map_err(SetupError::Secret)?;
            tracing::info!(secret = CREDENTIALS_SECRET, keys = bundle.len(), "updated credentials");
            Ok(())
        }
        Err(e) => Err(SetupError::Secret(e)),
    }
}

fn credentials_secret(namespace: &str, bundle: &CredentialBundle) -> Secret {
    let data = bundle
        .iter()
        .map(|(k, v)| (k.to_string(), ByteString(v.as_bytes().to_vec())))
        .collect();
    Secret {
        metadata: ObjectMeta {
            name: Some(CREDENTIALS_SECRET.to_string()),
            namespace: Some(namespace.to_string()),
            labels: Some(
                [("app.kubernetes.io/managed-by".to_string(), "bca-cli".to_string())]
                    .into_iter()
                    .collect(),
            ),
            ..Default::default()
        },
        type_: Some("Opaque".to_string()),
        data: Some(data),
        ..Default::default()
    }
}

#[cfg(test)]
#[path = "provision_tests.rs"]
mod tests;

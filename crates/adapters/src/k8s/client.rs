// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! [`ClusterApi`] backed by a live API server via `kube`.

use std::path::PathBuf;
use std::pin::pin;

use async_trait::async_trait;
use bca_core::JobStatus;
use futures_util::io::AsyncBufReadExt;
use futures_util::TryStreamExt;
use k8s_openapi::api::batch::v1::Job;
use k8s_openapi::api::core::v1::{Namespace, Pod, Secret};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use kube::api::{Api, ListParams, LogParams, PostParams};
use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::{Client, Config};

use crate::cluster::{ClusterApi, ClusterError, PodInfo};

/// How to reach the cluster. Built once at startup and passed down.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClusterConfig {
    /// Explicit kubeconfig file; `None` infers (env, ~/.kube/config, in-cluster)
    pub kubeconfig: Option<PathBuf>,
    pub context: Option<String>,
    pub namespace: String,
}

/// Cluster client scoped to one namespace.
#[derive(Clone)]
pub struct KubeCluster {
    client: Client,
    namespace: String,
}

impl KubeCluster {
    pub async fn connect(config: &ClusterConfig) -> Result<Self, ClusterError> {
        let options =
            KubeConfigOptions { context: config.context.clone(), ..Default::default() };
        let kube_config = match (&config.kubeconfig, &config.context) {
            (Some(path), _) => {
                let kubeconfig = Kubeconfig::read_from(path).map_err(|e| {
                    ClusterError::Config(format!("reading {}: {}", path.display(), e))
                })?;
                Config::from_custom_kubeconfig(kubeconfig, &options)
                    .await
                    .map_err(|e| ClusterError::Config(e.to_string()))?
            }
            (None, Some(_)) => Config::from_kubeconfig(&options)
                .await
                .map_err(|e| ClusterError::Config(e.to_string()))?,
            (None, None) => {
                Config::infer().await.map_err(|e| ClusterError::Config(e.to_string()))?
            }
        };
        let client = Client::try_from(kube_config)
            .map_err(|e| ClusterError::Config(format!("failed to create kube client: {}", e)))?;

        tracing::debug!(namespace = %config.namespace, "connected to cluster");
        Ok(Self { client, namespace: config.namespace.clone() })
    }

    fn namespaced<K>(&self) -> Api<K>
    where
        K: kube::Resource<Scope = k8s_openapi::NamespaceResourceScope>,
        <K as kube::Resource>::DynamicType: Default,
    {
        Api::namespaced(self.client.clone(), &self.namespace)
    }
}

/// Request that produced an API error; decides what a 409 means.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Verb {
    Create,
    Read,
    Replace,
}

fn cluster_err(verb: Verb, kind: &'static str, name: &str, err: kube::Error) -> ClusterError {
    match err {
        kube::Error::Api(resp) => status_err(verb, kind, name, resp.code, resp.message),
        other => ClusterError::Api { kind, name: name.to_string(), message: other.to_string() },
    }
}

fn status_err(
    verb: Verb,
    kind: &'static str,
    name: &str,
    code: u16,
    message: String,
) -> ClusterError {
    let name = name.to_string();
    match (code, verb) {
        (409, Verb::Create) => ClusterError::AlreadyExists { kind, name },
        // stale resourceVersion
        (409, _) => ClusterError::Conflict { kind, name },
        (404, _) => ClusterError::NotFound { kind, name },
        _ => ClusterError::Api { kind, name, message },
    }
}

fn object_name(meta: &ObjectMeta) -> &str {
    meta.name.as_deref().unwrap_or_default()
}

#[async_trait]
impl ClusterApi for KubeCluster {
    fn namespace(&self) -> &str {
        &self.namespace
    }

    async fn create_namespace(&self) -> Result<(), ClusterError> {
        let api: Api<Namespace> = Api::all(self.client.clone());
        let ns = Namespace {
            metadata: ObjectMeta { name: Some(self.namespace.clone()), ..Default::default() },
            ..Default::default()
        };
        api.create(&PostParams::default(), &ns)
            .await
            .map_err(|e| cluster_err(Verb::Create, "namespace", &self.namespace, e))?;
        Ok(())
    }

    async fn get_namespace(&self) -> Result<(), ClusterError> {
        let api: Api<Namespace> = Api::all(self.client.clone());
        api.get(&self.namespace)
            .await
            .map_err(|e| cluster_err(Verb::Read, "namespace", &self.namespace, e))?;
        Ok(())
    }

    async fn create_secret(&self, secret: &Secret) -> Result<(), ClusterError> {
        let name = object_name(&secret.metadata);
        self.namespaced::<Secret>()
            .create(&PostParams::default(), secret)
            .await
            .map_err(|e| cluster_err(Verb::Create, "secret", name, e))?;
        Ok(())
    }

    async fn get_secret(&self, name: &str) -> Result<Secret, ClusterError> {
        self.namespaced::<Secret>()
            .get(name)
            .await
            .map_err(|e| cluster_err(Verb::Read, "secret", name, e))
    }

    async fn replace_secret(&self, secret: &Secret) -> Result<(), ClusterError> {
        let name = object_name(&secret.metadata);
        self.namespaced::<Secret>()
            .replace(name, &PostParams::default(), secret)
            .await
            .map_err(|e| cluster_err(Verb::Replace, "secret", name, e))?;
        Ok(())
    }

    async fn create_job(&self, job: &Job) -> Result<(), ClusterError> {
        let name = object_name(&job.metadata);
        self.namespaced::<Job>()
            .create(&PostParams::default(), job)
            .await
            .map_err(|e| cluster_err(Verb::Create, "job", name, e))?;
        Ok(())
    }

    async fn job_status(&self, name: &str) -> Result<JobStatus, ClusterError> {
        let job = self
            .namespaced::<Job>()
            .get(name)
            .await
            .map_err(|e| cluster_err(Verb::Read, "job", name, e))?;
        Ok(super::job_status(&job))
    }

    async fn job_pods(&self, job_name: &str) -> Result<Vec<PodInfo>, ClusterError> {
        let lp = ListParams::default().labels(&format!("job-name={}", job_name));
        let pods = self
            .namespaced::<Pod>()
            .list(&lp)
            .await
            .map_err(|e| cluster_err(Verb::Read, "job", job_name, e))?;

        Ok(pods
            .into_iter()
            .map(|pod| {
                let spec = pod.spec.unwrap_or_default();
                PodInfo {
                    name: pod.metadata.name.unwrap_or_default(),
                    init_containers: spec
                        .init_containers
                        .unwrap_or_default()
                        .into_iter()
                        .map(|c| c.name)
                        .collect(),
                    containers: spec.containers.into_iter().map(|c| c.name).collect(),
                }
            })
            .collect())
    }

    async fn stream_logs(
        &self,
        pod: &str,
        container: &str,
        sink: &mut (dyn for<'l> FnMut(&'l str) + Send),
    ) -> Result<(), ClusterError> {
        let params = LogParams { container: Some(container.to_string()), ..Default::default() };
        let reader = self
            .namespaced::<Pod>()
            .log_stream(pod, &params)
            .await
            .map_err(|e| cluster_err(Verb::Read, "pod", pod, e))?;

        let mut lines = pin!(reader.lines());
        while let Some(line) = lines.try_next().await.map_err(|e| ClusterError::Api {
            kind: "pod",
            name: pod.to_string(),
            message: format!("log stream for {}: {}", container, e),
        })? {
            sink(&line);
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;

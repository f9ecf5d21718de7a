// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory [`ClusterApi`] for tests.
//!
//! Job statuses are scripted per repository URL before submission, since job
//! names carry a random suffix. Each status query consumes one scripted step;
//! the last step repeats forever.

use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};
use std::sync::Arc;

use async_trait::async_trait;
use bca_core::{sanitize_label, JobStatus};
use k8s_openapi::api::batch::v1::Job;
use k8s_openapi::api::core::v1::Secret;
use parking_lot::Mutex;

use crate::cluster::{ClusterApi, ClusterError, PodInfo};

/// Recorded cluster call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClusterCall {
    CreateNamespace,
    GetNamespace,
    CreateSecret(String),
    GetSecret(String),
    ReplaceSecret(String),
    CreateJob(String),
    JobStatus(String),
    JobPods(String),
    StreamLogs { pod: String, container: String },
}

/// One scripted answer to a status query; `None` is a query error.
type Step = Option<JobStatus>;

#[derive(Default)]
struct FakeState {
    namespace_exists: bool,
    fail_namespace: bool,
    fail_namespace_get: bool,
    fail_secret_create: bool,
    fail_secret_replace: bool,
    secrets: BTreeMap<String, Secret>,
    jobs: Vec<Job>,
    /// Keyed by sanitized repo label until a job for that repo is created
    scripts: HashMap<String, VecDeque<Step>>,
    /// Keyed by job name
    progress: HashMap<String, VecDeque<Step>>,
    fail_create: HashSet<String>,
    no_pods: bool,
    logs: HashMap<String, Vec<String>>,
    failing_logs: HashSet<String>,
    calls: Vec<ClusterCall>,
}

/// Fake cluster scoped to one namespace. Clones share state.
#[derive(Clone)]
pub struct FakeCluster {
    namespace: String,
    state: Arc<Mutex<FakeState>>,
}

impl Default for FakeCluster {
    fn default() -> Self {
        Self::new("default")
    }
}

impl FakeCluster {
    pub fn new(namespace: &str) -> Self {
        Self { namespace: namespace.to_string(), state: Arc::new(Mutex::new(FakeState::default())) }
    }

    /// Start with the namespace already present.
    pub fn with_namespace(self) -> Self {
        self.state.lock().namespace_exists = true;
        self
    }

    /// Script the statuses reported for the job created for `repo_url`.
    pub fn script_status(&self, repo_url: &str, steps: impl IntoIterator<Item = JobStatus>) {
        let mut state = self.state.lock();
        let queue = state.scripts.entry(sanitize_label(repo_url)).or_default();
        queue.extend(steps.into_iter().map(Some));
    }

    /// Make the next `n` status queries for `repo_url`'s job fail.
    pub fn fail_status_queries(&self, repo_url: &str, n: usize) {
        let mut state = self.state.lock();
        let queue = state.scripts.entry(sanitize_label(repo_url)).or_default();
        for _ in 0..n {
            queue.push_front(None);
        }
    }

    /// Reject job creation for `repo_url`.
    pub fn fail_job_creation(&self, repo_url: &str) {
        self.state.lock().fail_create.insert(sanitize_label(repo_url));
    }

    /// Reject namespace creation with a non-conflict error.
    pub fn fail_namespace_creation(&self) {
        self.state.lock().fail_namespace = true;
    }

    /// Fail namespace lookups with a non-conflict error.
    pub fn fail_namespace_lookup(&self) {
        self.state.lock().fail_namespace_get = true;
    }

    /// Reject secret creation with a non-conflict error.
    pub fn fail_secret_creation(&self) {
        self.state.lock().fail_secret_create = true;
    }

    /// Reject secret replacement as a concurrent modification.
    pub fn fail_secret_replace(&self) {
        self.state.lock().fail_secret_replace = true;
    }

    /// Report no pods for any job.
    pub fn without_pods(&self) {
        self.state.lock().no_pods = true;
    }

    /// Lines returned when streaming `container`'s log.
    pub fn set_logs(&self, container: &str, lines: &[&str]) {
        self.state
            .lock()
            .logs
            .insert(container.to_string(), lines.iter().map(|l| l.to_string()).collect());
    }

    /// Make streaming `container`'s log fail.
    pub fn fail_logs(&self, container: &str) {
        self.state.lock().failing_logs.insert(container.to_string());
    }

    pub fn namespace_exists(&self) -> bool {
        self.state.lock().namespace_exists
    }

    /// Submitted jobs in submission order.
    pub fn jobs(&self) -> Vec<Job> {
        self.state.lock().jobs.clone()
    }

    pub fn secret(&self, name: &str) -> Option<Secret> {
        self.state.lock().secrets.get(name).cloned()
    }

    /// Decoded `data` of a stored secret.
    pub fn secret_data(&self, name: &str) -> BTreeMap<String, String> {
        self.secret(name)
            .and_then(|s| s.data)
            .unwrap_or_default()
            .into_iter()
            .map(|(k, v)| (k, String::from_utf8_lossy(&v.0).into_owned()))
            .collect()
    }

    pub fn calls(&self) -> Vec<ClusterCall> {
        self.state.lock().calls.clone()
    }

    /// Count recorded calls matching `pred`.
    pub fn count(&self, pred: impl Fn(&ClusterCall) -> bool) -> usize {
        self.state.lock().calls.iter().filter(|c| pred(c)).count()
    }

    fn record(&self, call: ClusterCall) {
        self.state.lock().calls.push(call);
    }
}

fn name_of(meta: &k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta) -> String {
    meta.name.clone().unwrap_or_default()
}

fn repo_label(job: &Job) -> String {
    job.metadata
        .labels
        .as_ref()
        .and_then(|l| l.get("repo"))
        .cloned()
        .unwrap_or_default()
}

#[async_trait]
impl ClusterApi for FakeCluster {
    fn namespace(&self) -> &str {
        &self.namespace
    }

    async fn create_namespace(&self) -> Result<(), ClusterError> {
        self.record(ClusterCall::CreateNamespace);
        let mut state = self.state.lock();
        if state.fail_namespace {
            return Err(ClusterError::Api {
                kind: "namespace",
                name: self.namespace.clone(),
                message: "forbidden".to_string(),
            });
        }
        if state.namespace_exists {
            return Err(ClusterError::AlreadyExists {
                kind: "namespace",
                name: self.namespace.clone(),
            });
        }
        state.namespace_exists = true;
        Ok(())
    }

    async fn get_namespace(&self) -> Result<(), ClusterError> {
        self.record(ClusterCall::GetNamespace);
        let state = self.state.lock();
        if state.fail_namespace_get {
            return Err(ClusterError::Api {
                kind: "namespace",
                name: self.namespace.clone(),
                message: "forbidden".to_string(),
            });
        }
        if state.namespace_exists {
            Ok(())
        } else {
            Err(ClusterError::NotFound { kind: "namespace", name: self.namespace.clone() })
        }
    }

    async fn create_secret(&self, secret: &Secret) -> Result<(), ClusterError> {
        let name = name_of(&secret.metadata);
        self.record(ClusterCall::CreateSecret(name.clone()));
        let mut state = self.state.lock();
        if state.fail_secret_create {
            return Err(ClusterError::Api {
                kind: "secret",
                name,
                message: "exceeded quota".to_string(),
            });
        }
        if state.secrets.contains_key(&name) {
            return Err(ClusterError::AlreadyExists { kind: "secret", name });
        }
        state.secrets.insert(name, secret.clone());
        Ok(())
    }

    async fn get_secret(&self, name: &str) -> Result<Secret, ClusterError> {
        self.record(ClusterCall::GetSecret(name.to_string()));
        self.state
            .lock()
            .secrets
            .get(name)
            .cloned()
            .ok_or_else(|| ClusterError::NotFound { kind: "secret", name: name.to_string() })
    }

    async fn replace_secret(&self, secret: &Secret) -> Result<(), ClusterError> {
        let name = name_of(&secret.metadata);
        self.record(ClusterCall::ReplaceSecret(name.clone()));
        let mut state = self.state.lock();
        if state.fail_secret_replace {
            return Err(ClusterError::Conflict { kind: "secret", name });
        }
        match state.secrets.get_mut(&name) {
            Some(existing) => {
                *existing = secret.clone();
                Ok(())
            }
            None => Err(ClusterError::NotFound { kind: "secret", name }),
        }
    }

    async fn create_job(&self, job: &Job) -> Result<(), ClusterError> {
        let name = name_of(&job.metadata);
        self.record(ClusterCall::CreateJob(name.clone()));
        let label = repo_label(job);
        let mut state = self.state.lock();
        if state.fail_create.contains(&label) {
            return Err(ClusterError::Api {
                kind: "job",
                name,
                message: "admission webhook denied the request".to_string(),
            });
        }
        if state.jobs.iter().any(|j| j.metadata.name.as_deref() == Some(name.as_str())) {
            return Err(ClusterError::AlreadyExists { kind: "job", name });
        }
        let script = state.scripts.remove(&label).unwrap_or_default();
        state.progress.insert(name, script);
        state.jobs.push(job.clone());
        Ok(())
    }

    async fn job_status(&self, name: &str) -> Result<JobStatus, ClusterError> {
        self.record(ClusterCall::JobStatus(name.to_string()));
        let mut state = self.state.lock();
        let Some(queue) = state.progress.get_mut(name) else {
            return Err(ClusterError::NotFound { kind: "job", name: name.to_string() });
        };
        let step = match queue.len() {
            0 => Some(JobStatus::Pending),
            1 => queue.front().copied().flatten(),
            _ => queue.pop_front().flatten(),
        };
        step.ok_or_else(|| ClusterError::Api {
            kind: "job",
            name: name.to_string(),
            message: "connection reset".to_string(),
        })
    }

    async fn job_pods(&self, job_name: &str) -> Result<Vec<PodInfo>, ClusterError> {
        self.record(ClusterCall::JobPods(job_name.to_string()));
        let state = self.state.lock();
        if state.no_pods {
            return Ok(Vec::new());
        }
        let Some(job) =
            state.jobs.iter().find(|j| j.metadata.name.as_deref() == Some(job_name))
        else {
            return Ok(Vec::new());
        };
        let spec = job.spec.as_ref().and_then(|s| s.template.spec.as_ref());
        let names = |cs: Option<&Vec<k8s_openapi::api::core::v1::Container>>| {
            cs.into_iter().flatten().map(|c| c.name.clone()).collect::<Vec<_>>()
        };
        Ok(vec![PodInfo {
            name: format!("{}-pod", job_name),
            init_containers: names(spec.and_then(|s| s.init_containers.as_ref())),
            containers: names(spec.map(|s| &s.containers)),
        }])
    }

    async fn stream_logs(
        &self,
        pod: &str,
        container: &str,
        sink: &mut (dyn for<'l> FnMut(&'l str) + Send),
    ) -> Result<(), ClusterError> {
        self.record(ClusterCall::StreamLogs {
            pod: pod.to_string(),
            container: container.to_string(),
        });
        let lines = {
            let state = self.state.lock();
            if state.failing_logs.contains(container) {
                return Err(ClusterError::Api {
                    kind: "pod",
                    name: pod.to_string(),
                    message: format!("container {} is waiting to start", container),
                });
            }
            state.logs.get(container).cloned().unwrap_or_default()
        };
        for line in &lines {
            sink(line);
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;

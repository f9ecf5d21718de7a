// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Stage log passthrough for jobs that reached a terminal state.

use bca_adapters::ClusterApi;

/// Destination for raw job log lines.
pub trait LogSink: Send {
    fn line(&mut self, line: &str);
}

/// Writes log lines to stdout, unstructured.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutSink;

impl LogSink for StdoutSink {
    fn line(&mut self, line: &str) {
        println!("{}", line);
    }
}

/// Captures lines for assertions.
#[cfg(test)]
impl LogSink for Vec<String> {
    fn line(&mut self, line: &str) {
        self.push(line.to_string());
    }
}

/// Stream every stage's log of the job's first pod: init stages first, then
/// the main stage. Failures are logged and skipped.
pub async fn emit_logs<C, S>(cluster: &C, job_name: &str, sink: &mut S)
where
    C: ClusterApi + ?Sized,
    S: LogSink + ?Sized,
{
    let pods = match cluster.job_pods(job_name).await {
        Ok(pods) => pods,
        Err(e) => {
            tracing::warn!(job = %job_name, error = %e, "failed to list pods for job");
            return;
        }
    };
    let Some(pod) = pods.first() else {
        tracing::warn!(job = %job_name, "no pods found for job");
        return;
    };

    tracing::info!(job = %job_name, pod = %pod.name, "=== pod logs ===");
    for (container, init) in pod.stages() {
        let stage = if init { "init-container" } else { "container" };
        tracing::info!(%container, stage, "--- logs ---");
        let mut forward = |line: &str| sink.line(line);
        if let Err(e) = cluster.stream_logs(&pod.name, container, &mut forward).await {
            tracing::warn!(pod = %pod.name, %container, stage, error = %e, "failed to read logs");
        }
    }
    tracing::info!(job = %job_name, "=== end of logs ===");
}

#[cfg(test)]
#[path = "diagnostics_tests.rs"]
mod tests;

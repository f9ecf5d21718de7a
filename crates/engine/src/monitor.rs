// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Polling loop that watches submitted jobs to a terminal verdict.
//!
//! One task, three wake sources: cancellation, the absolute deadline, and a
//! fixed-interval ticker whose first tick lands one interval after start.
//! Ties go to cancellation, then the deadline.

use std::time::Duration;

use bca_adapters::ClusterApi;
use bca_core::{JobStatus, JobSummary};
use indexmap::IndexMap;
use tokio::time::{interval_at, sleep_until, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::diagnostics::{emit_logs, LogSink};
use crate::error::ApplyError;

/// Floor for the poll interval. Tokio rejects a zero period.
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct UnitState {
    status: Option<JobStatus>,
    diagnostics_emitted: bool,
}

/// What changed when a status was recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Observation {
    pub previous: Option<JobStatus>,
    /// First time this unit was seen terminal
    pub newly_terminal: bool,
}

/// Last-observed status per job, in submission order.
#[derive(Debug, Default)]
pub(crate) struct MonitorState {
    units: IndexMap<String, UnitState>,
}

impl MonitorState {
    pub fn new<'a>(names: impl IntoIterator<Item = &'a str>) -> Self {
        Self { units: names.into_iter().map(|n| (n.to_string(), UnitState::default())).collect() }
    }

    /// Jobs that still need polling. Terminal statuses are never re-polled.
    pub fn pending(&self) -> Vec<String> {
        self.units
            .iter()
            .filter(|(_, u)| !u.status.is_some_and(|s| s.is_terminal()))
            .map(|(n, _)| n.clone())
            .collect()
    }

    pub fn record(&mut self, name: &str, status: JobStatus) -> Observation {
        let unit = self.units.entry(name.to_string()).or_default();
        let previous = unit.status;
        // monotonic once terminal
        if !previous.is_some_and(|s| s.is_terminal()) {
            unit.status = Some(status);
        }
        let newly_terminal = status.is_terminal() && !unit.diagnostics_emitted;
        if newly_terminal {
            unit.diagnostics_emitted = true;
        }
        Observation { previous, newly_terminal }
    }

    pub fn all_terminal(&self) -> bool {
        self.units.values().all(|u| u.status.is_some_and(|s| s.is_terminal()))
    }

    pub fn any_failed(&self) -> bool {
        self.units.values().any(|u| u.status == Some(JobStatus::Failed))
    }

    /// Unobserved jobs are reported as `Pending`.
    pub fn summary(&self) -> JobSummary {
        self.units
            .iter()
            .map(|(n, u)| (n.clone(), u.status.unwrap_or(JobStatus::Pending)))
            .collect()
    }
}

/// Poll `names` until every job is terminal, the deadline passes, or `cancel` fires.
pub async fn wait_for_jobs<C, S>(
    cluster: &C,
    names: &[String],
    poll_interval: Duration,
    timeout: Duration,
    sink: &mut S,
    cancel: &CancellationToken,
) -> Result<JobSummary, ApplyError>
where
    C: ClusterApi + ?Sized,
    S: LogSink + ?Sized,
{
    if poll_interval < MIN_POLL_INTERVAL {
        tracing::warn!(
            requested = ?poll_interval,
            minimum = ?MIN_POLL_INTERVAL,
            "poll interval below minimum"
        );
    }
    let poll_interval = poll_interval.max(MIN_POLL_INTERVAL);
    let mut state = MonitorState::new(names.iter().map(String::as_str));
    let start = Instant::now();
    let deadline = sleep_until(start + timeout);
    tokio::pin!(deadline);
    let mut ticker = interval_at(start + poll_interval, poll_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    tracing::info!(
        jobs = names.len(),
        poll_secs = poll_interval.as_secs_f64(),
        timeout_secs = timeout.as_secs(),
        "waiting for jobs"
    );

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                log_summary(&state.summary());
                return Err(ApplyError::Cancelled);
            }
            _ = &mut deadline => {
                let summary = state.summary();
                tracing::error!(timeout_secs = timeout.as_secs(), "timed out waiting for jobs");
                log_summary(&summary);
                return Err(ApplyError::Timeout { summary });
            }
            _ = ticker.tick() => {}
        }

        let cancelled = tokio::select! {
            biased;
            _ = cancel.cancelled() => true,
            _ = poll_once(cluster, &mut state, sink) => false,
        };
        if cancelled {
            log_summary(&state.summary());
            return Err(ApplyError::Cancelled);
        }

        if state.all_terminal() {
            let summary = state.summary();
            if state.any_failed() {
                tracing::error!("some jobs failed");
                log_summary(&summary);
                return Err(ApplyError::JobsFailed { summary });
            }
            tracing::info!("all jobs completed successfully");
            log_summary(&summary);
            return Ok(summary);
        }
    }
}

/// One scan over the non-terminal jobs.
async fn poll_once<C, S>(cluster: &C, state: &mut MonitorState, sink: &mut S)
where
    C: ClusterApi + ?Sized,
    S: LogSink + ?Sized,
{
    for name in state.pending() {
        let status = match cluster.job_status(&name).await {
            Ok(status) => status,
            Err(e) => {
                tracing::warn!(job = %name, error = %e, "failed to get job status");
                continue;
            }
        };

        let seen = state.record(&name, status);
        if seen.previous != Some(status) {
            tracing::info!(job = %name, %status, "job status changed");
        }
        if seen.newly_terminal {
            emit_logs(cluster, &name, sink).await;
        }
    }
}

fn log_summary(summary: &JobSummary) {
    tracing::info!("job summary");
    for (job, status) in summary {
        tracing::info!(%job, %status, "job status");
    }
}

#[cfg(test)]
#[path = "monitor_tests.rs"]
mod tests;

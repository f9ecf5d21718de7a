// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Observed lifecycle state of a submitted job.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Status derived from the scheduler's condition report.
///
/// Transitions are monotonic: `Pending → Running → {Complete | Failed}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JobStatus {
    Pending,
    Running,
    Complete,
    Failed,
}

crate::simple_display! {
    JobStatus {
        Pending => "Pending",
        Running => "Running",
        Complete => "Complete",
        Failed => "Failed",
    }
}

impl JobStatus {
    /// Returns true for `Complete` and `Failed`.
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Complete | JobStatus::Failed)
    }
}

/// Final (or last observed) status per job, in submission order.
pub type JobSummary = IndexMap<String, JobStatus>;

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;

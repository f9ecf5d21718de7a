// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job condition report → [`JobStatus`].

use bca_core::JobStatus;
use k8s_openapi::api::batch::v1::Job;

/// Derive a job's status: a true `Complete`/`Failed` condition wins, then any
/// active pod means `Running`, otherwise `Pending`.
pub fn job_status(job: &Job) -> JobStatus {
    let Some(status) = job.status.as_ref() else {
        return JobStatus::Pending;
    };

    for condition in status.conditions.iter().flatten() {
        if condition.status != "True" {
            continue;
        }
        match condition.type_.as_str() {
            "Complete" => return JobStatus::Complete,
            "Failed" => return JobStatus::Failed,
            _ => {}
        }
    }

    if status.active.unwrap_or(0) > 0 {
        JobStatus::Running
    } else {
        JobStatus::Pending
    }
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;

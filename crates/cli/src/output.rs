// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use bca_core::JobSummary;
use bca_engine::SubmittedJob;

use crate::color;

#[cfg(test)]
#[path = "output_tests.rs"]
mod tests;

/// Render a two-column job/status table, jobs in submission order.
pub fn format_summary(summary: &JobSummary, colorize: bool) -> String {
    let width = summary.keys().map(String::len).max().unwrap_or(0).max("JOB".len());
    let mut out = String::new();

    let header = format!("{:<width$}  STATUS", "JOB");
    if colorize {
        out.push_str(&color::header(&header));
    } else {
        out.push_str(&header);
    }
    out.push('\n');

    for (job, status) in summary {
        let label = status.to_string();
        let label = if colorize { color::status(*status, &label) } else { label };
        out.push_str(&format!("{:<width$}  {}\n", job, label));
    }
    out
}

pub fn print_summary(summary: &JobSummary) {
    print!("{}", format_summary(summary, color::should_colorize()));
}

/// One line per submitted job, kubectl style.
pub fn format_submitted(jobs: &[SubmittedJob]) -> String {
    jobs.iter().map(|j| format!("job/{} created ({})\n", j.name, j.repo)).collect()
}

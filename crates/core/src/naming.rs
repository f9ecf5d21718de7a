// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job names and label values derived from repository URLs.
//!
//! Job names are DNS-1123 labels: the scheduler copies them into the
//! `job-name` pod label, which caps them at 63 characters.
//!
//! ```text
//! https://github.com/Org/Repo.git  →  bca-org-repo-3f9c01ab
//! not a url                        →  bca-job-3f9c01ab
//! ```

/// Prefix shared by every generated job name.
pub const JOB_PREFIX: &str = "bca";

/// Kubernetes limit for names that end up in label values.
pub const MAX_NAME_LEN: usize = 63;

/// Hex characters in the random suffix.
const SUFFIX_LEN: usize = 8;

/// Derive a unique job name for a repository URL.
///
/// Unparsable or schemeless input falls back to `bca-job-<suffix>`.
pub fn derive_job_name(repo_url: &str) -> String {
    let suffix = random_suffix();
    let Some(path) = repo_path(repo_url) else {
        return format!("{}-job-{}", JOB_PREFIX, suffix);
    };

    // 63 - "bca-" - "-" - suffix
    let max_path_len = MAX_NAME_LEN - JOB_PREFIX.len() - 2 - SUFFIX_LEN;
    let path = path.trim_start_matches('/');
    let mut path: String = path
        .strip_suffix(".git")
        .unwrap_or(path)
        .chars()
        .map(|c| match c.to_ascii_lowercase() {
            c @ ('a'..='z' | '0'..='9' | '-') => c,
            _ => '-',
        })
        .collect();
    path.truncate(max_path_len);

    format!("{}-{}-{}", JOB_PREFIX, path, suffix)
}

/// Sanitize a repository URL into a label value (discovery only, not unique).
pub fn sanitize_label(repo_url: &str) -> String {
    let without_scheme = match repo_url.find("://") {
        Some(idx) => &repo_url[idx + 3..],
        None => repo_url,
    };

    let mut label: String = without_scheme
        .chars()
        .map(|c| match c.to_ascii_lowercase() {
            c @ ('a'..='z' | '0'..='9' | '-' | '_') => c,
            _ => '-',
        })
        .collect();
    label.truncate(MAX_NAME_LEN);

    // Label values must begin and end with an alphanumeric character
    label
        .trim_matches(|c: char| !c.is_ascii_alphanumeric())
        .to_string()
}

/// Path component of an absolute URL, or `None` when the URL has no scheme.
fn repo_path(repo_url: &str) -> Option<String> {
    let parsed = url::Url::parse(repo_url).ok()?;
    if parsed.cannot_be_a_base() {
        return None;
    }
    Some(parsed.path().to_string())
}

/// Eight lowercase hex characters from a cryptographically strong source.
fn random_suffix() -> String {
    let id = uuid::Uuid::new_v4().simple().to_string();
    id[..SUFFIX_LEN].to_string()
}

#[cfg(test)]
#[path = "naming_tests.rs"]
mod tests;

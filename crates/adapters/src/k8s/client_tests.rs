// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use kube::core::ErrorResponse;

fn api_error(code: u16, reason: &str) -> kube::Error {
    kube::Error::Api(ErrorResponse {
        status: "Failure".to_string(),
        message: format!("secrets \"bca-credentials\" {}", reason),
        reason: reason.to_string(),
        code,
    })
}

#[yare::parameterized(
    create_conflict  = { Verb::Create,  409, "AlreadyExists" },
    replace_conflict = { Verb::Replace, 409, "Conflict" },
    read_missing     = { Verb::Read,    404, "NotFound" },
    replace_missing  = { Verb::Replace, 404, "NotFound" },
    forbidden        = { Verb::Create,  403, "Api" },
)]
fn api_status_codes(verb: Verb, code: u16, expected: &str) {
    let err = cluster_err(verb, "secret", "bca-credentials", api_error(code, "rejected"));
    let variant = match err {
        ClusterError::AlreadyExists { .. } => "AlreadyExists",
        ClusterError::Conflict { .. } => "Conflict",
        ClusterError::NotFound { .. } => "NotFound",
        ClusterError::Api { .. } => "Api",
        ClusterError::Config(_) => "Config",
    };
    assert_eq!(variant, expected);
}

#[test]
fn replace_conflict_is_not_reported_as_existing() {
    let err = cluster_err(Verb::Replace, "secret", "bca-credentials", api_error(409, "Conflict"));
    assert!(!err.is_already_exists());
    assert_eq!(err.to_string(), "secret bca-credentials was modified concurrently");
}

#[test]
fn other_statuses_keep_the_server_message() {
    let err = cluster_err(Verb::Create, "job", "bca-x-1", api_error(422, "is invalid"));
    assert_eq!(err.to_string(), "job bca-x-1: secrets \"bca-credentials\" is invalid");
}

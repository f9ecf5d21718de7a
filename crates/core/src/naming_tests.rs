// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use proptest::prelude::*;
use std::collections::HashSet;

fn split_suffix(name: &str) -> (&str, &str) {
    name.split_at(name.len() - SUFFIX_LEN)
}

fn is_hex(s: &str) -> bool {
    s.len() == SUFFIX_LEN && s.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase())
}

#[yare::parameterized(
    github_https     = { "https://github.com/example/repo1",         "bca-example-repo1-" },
    strips_dot_git   = { "https://github.com/example/repo1.git",     "bca-example-repo1-" },
    lowercases       = { "https://github.com/Example/MyRepo",        "bca-example-myrepo-" },
    nested_groups    = { "https://gitlab.com/group/sub/project.git", "bca-group-sub-project-" },
    underscores      = { "https://github.com/example/my_repo",       "bca-example-my-repo-" },
    host_only        = { "https://github.com",                       "bca--" },
)]
fn derives_name_from_url_path(url: &str, expected_prefix: &str) {
    let name = derive_job_name(url);
    let (head, suffix) = split_suffix(&name);
    assert_eq!(head, expected_prefix);
    assert!(is_hex(suffix), "suffix {suffix} is not 8 lowercase hex chars");
}

#[yare::parameterized(
    no_scheme  = { "github.com/example/repo" },
    scp_style  = { "git@github.com:example/repo.git" },
    garbage    = { "not a url" },
    empty      = { "" },
)]
fn falls_back_to_generic_name(url: &str) {
    let name = derive_job_name(url);
    let (head, suffix) = split_suffix(&name);
    assert_eq!(head, "bca-job-");
    assert!(is_hex(suffix));
}

#[test]
fn long_paths_are_truncated_to_fit() {
    let url = format!("https://github.com/{}/{}", "a".repeat(40), "b".repeat(40));
    let name = derive_job_name(&url);
    assert_eq!(name.len(), MAX_NAME_LEN);
    assert!(name.starts_with("bca-aaaa"));
}

#[test]
fn repeated_calls_are_unique() {
    let names: HashSet<String> =
        (0..1000).map(|_| derive_job_name("https://github.com/example/repo")).collect();
    // collision rate below 1%
    assert!(names.len() > 990, "only {} unique names out of 1000", names.len());
}

#[yare::parameterized(
    https       = { "https://github.com/example/repo",     "github-com-example-repo" },
    http        = { "http://github.com/Example/Repo.git",  "github-com-example-repo-git" },
    scp_style   = { "git@github.com:example/repo.git",     "git-github-com-example-repo-git" },
    trailing    = { "https://github.com/example/repo/",    "github-com-example-repo" },
)]
fn sanitizes_labels(url: &str, expected: &str) {
    assert_eq!(sanitize_label(url), expected);
}

#[test]
fn long_labels_are_truncated() {
    let url = format!("https://github.com/example/{}", "x".repeat(100));
    let label = sanitize_label(&url);
    assert_eq!(label.len(), MAX_NAME_LEN);
}

fn arb_repo_url() -> impl Strategy<Value = String> {
    (
        prop_oneof![Just("https"), Just("http"), Just("ssh"), Just("git")],
        "[a-zA-Z0-9.-]{1,20}",
        proptest::collection::vec("[a-zA-Z0-9_.-]{1,30}", 1..5),
        proptest::bool::ANY,
    )
        .prop_map(|(scheme, host, segments, dot_git)| {
            let suffix = if dot_git { ".git" } else { "" };
            format!("{}://{}/{}{}", scheme, host, segments.join("/"), suffix)
        })
}

proptest! {
    #[test]
    fn derived_names_are_dns_safe(url in arb_repo_url()) {
        let name = derive_job_name(&url);
        prop_assert!(name.len() <= MAX_NAME_LEN);
        prop_assert!(name.starts_with("bca-"));
        prop_assert!(name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'));
        prop_assert!(name.chars().last().is_some_and(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn derived_names_handle_arbitrary_input(input in ".{0,120}") {
        let name = derive_job_name(&input);
        prop_assert!(name.len() <= MAX_NAME_LEN);
        prop_assert!(name.starts_with("bca-"));
        prop_assert!(!name.chars().any(|c| c.is_ascii_uppercase()));
    }

    #[test]
    fn labels_are_valid_label_values(url in arb_repo_url()) {
        let label = sanitize_label(&url);
        prop_assert!(label.len() <= MAX_NAME_LEN);
        prop_assert!(!label.contains('/'));
        prop_assert!(!label.contains("://"));
        prop_assert!(!label.chars().any(|c| c.is_ascii_uppercase()));
        if let (Some(first), Some(last)) = (label.chars().next(), label.chars().last()) {
            prop_assert!(first.is_ascii_alphanumeric() && last.is_ascii_alphanumeric());
        }
    }
}

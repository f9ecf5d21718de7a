// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! bca-core: domain types for dispatching a Change across repositories

pub mod macros;

pub mod agent;
pub mod change;
pub mod credentials;
pub mod naming;
pub mod status;

pub use agent::{AgentDef, CredentialDelivery, OAuthFile};
pub use change::{Change, ChangeError, ChangeSpec, DEFAULT_BRANCH};
pub use credentials::{CredentialBundle, CredentialError};
pub use naming::{derive_job_name, sanitize_label, JOB_PREFIX, MAX_NAME_LEN};
pub use status::{JobStatus, JobSummary};

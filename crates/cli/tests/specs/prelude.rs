// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared helpers for CLI specs

use std::path::{Path, PathBuf};
use std::process::Output;

use assert_cmd::Command;

/// Start a `bca` invocation isolated from the caller's config and credentials.
pub fn cli() -> Cli {
    let mut cmd = Command::cargo_bin("bca").unwrap();
    for var in [
        "BCA_CONFIG",
        "BCA_NAMESPACE",
        "BCA_KUBECONFIG",
        "BCA_CONTEXT",
        "BCA_IMAGE",
        "BCA_LOG_LEVEL",
        "RUST_LOG",
        "GITHUB_TOKEN",
        "COPILOT_TOKEN",
        "GEMINI_API_KEY",
        "KUBECONFIG",
    ] {
        cmd.env_remove(var);
    }
    cmd.env("NO_COLOR", "1");
    Cli { cmd }
}

pub struct Cli {
    cmd: Command,
}

impl Cli {
    pub fn args(mut self, args: &[&str]) -> Self {
        self.cmd.args(args);
        self
    }

    pub fn env(mut self, key: &str, value: impl AsRef<std::ffi::OsStr>) -> Self {
        self.cmd.env(key, value);
        self
    }

    pub fn passes(mut self) -> Run {
        let run = Run { output: self.cmd.output().unwrap() };
        assert!(run.output.status.success(), "expected success\n{}", run.describe());
        run
    }

    pub fn exits(mut self, code: i32) -> Run {
        let run = Run { output: self.cmd.output().unwrap() };
        assert_eq!(run.output.status.code(), Some(code), "{}", run.describe());
        run
    }
}

pub struct Run {
    output: Output,
}

impl Run {
    pub fn stdout(&self) -> String {
        String::from_utf8_lossy(&self.output.stdout).into_owned()
    }

    pub fn stderr(&self) -> String {
        String::from_utf8_lossy(&self.output.stderr).into_owned()
    }

    pub fn stdout_has(self, needle: &str) -> Self {
        assert!(self.stdout().contains(needle), "stdout lacks {needle:?}\n{}", self.describe());
        self
    }

    pub fn stderr_has(self, needle: &str) -> Self {
        assert!(self.stderr().contains(needle), "stderr lacks {needle:?}\n{}", self.describe());
        self
    }

    fn describe(&self) -> String {
        format!("--- stdout\n{}--- stderr\n{}", self.stdout(), self.stderr())
    }
}

/// Scratch directory holding change and config files.
pub struct Project {
    dir: tempfile::TempDir,
}

impl Project {
    pub fn empty() -> Self {
        Self { dir: tempfile::tempdir().unwrap() }
    }

    pub fn file(&self, name: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }
}

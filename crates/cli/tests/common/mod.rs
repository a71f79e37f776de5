// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared helpers for CLI integration tests.

#![allow(dead_code)]

use assert_cmd::Command;
use std::path::Path;
use tempfile::TempDir;

/// Fresh data directory, removed when dropped
pub fn data_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp directory")
}

/// `tsync` pointed at the given data directory, with logging silenced
pub fn tsync(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("tsync").expect("tsync binary should be built");
    cmd.arg("--data-dir").arg(dir).env_remove("RUST_LOG");
    cmd
}

/// `tsync` as a plain process, for running several at once
pub fn tsync_process(dir: &Path) -> std::process::Command {
    let mut cmd = std::process::Command::new(assert_cmd::cargo::cargo_bin("tsync"));
    cmd.arg("--data-dir").arg(dir).env_remove("RUST_LOG");
    cmd
}

/// Run `tsync` and return stdout, asserting success
pub fn run(dir: &Path, args: &[&str]) -> String {
    let output = tsync(dir).args(args).assert().success().get_output().clone();
    String::from_utf8(output.stdout).expect("stdout should be utf-8")
}

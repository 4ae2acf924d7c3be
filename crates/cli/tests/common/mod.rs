// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test utilities for CLI integration tests.

#![allow(dead_code)]

use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A private lease store directory plus scratch space for test files
pub struct TestEnv {
    temp: TempDir,
}

impl TestEnv {
    pub fn new() -> Self {
        Self {
            temp: TempDir::new().expect("Failed to create temp directory"),
        }
    }

    pub fn store_dir(&self) -> PathBuf {
        self.temp.path().join("store")
    }

    pub fn path(&self) -> &Path {
        self.temp.path()
    }

    /// Write a file relative to the scratch directory and return its path
    pub fn file(&self, name: &str, content: &str) -> PathBuf {
        let path = self.temp.path().join(name);
        fs::write(&path, content).expect("Failed to write test file");
        path
    }

    /// `tenure --store <store>` with logging quiet unless asked for
    pub fn tenure(&self) -> Command {
        let mut cmd = Command::cargo_bin("tenure").expect("tenure binary should be built");
        cmd.arg("--store")
            .arg(self.store_dir())
            .env_remove("TENURE_STORE")
            .env_remove("RUST_LOG")
            .env("TENURE_LOG", "warn");
        cmd
    }
}

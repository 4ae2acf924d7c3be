//! Shared helpers for black-box specs of the tenure binary.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::{Child, Command, Output, Stdio};

/// Path to the built `tenure` binary
pub fn tenure_bin() -> PathBuf {
    assert_cmd::cargo::cargo_bin("tenure")
}

/// An isolated lease store plus scratch space
pub struct Store {
    temp: tempfile::TempDir,
}

impl Store {
    pub fn empty() -> Self {
        Self {
            temp: tempfile::tempdir().unwrap(),
        }
    }

    pub fn dir(&self) -> PathBuf {
        self.temp.path().join("store")
    }

    pub fn scratch(&self) -> &Path {
        self.temp.path()
    }

    pub fn file(&self, name: &str, content: &str) -> PathBuf {
        let path = self.temp.path().join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    pub fn tenure(&self) -> CliBuilder {
        CliBuilder::new(self.dir())
    }
}

/// Builder for one `tenure` invocation
pub struct CliBuilder {
    cmd: Command,
}

impl CliBuilder {
    fn new(store: PathBuf) -> Self {
        let mut cmd = Command::new(tenure_bin());
        cmd.arg("--store")
            .arg(store)
            .env_remove("TENURE_STORE")
            .env_remove("RUST_LOG")
            .env("TENURE_LOG", "warn");
        Self { cmd }
    }

    pub fn args(mut self, args: &[&str]) -> Self {
        self.cmd.args(args);
        self
    }

    pub fn env(mut self, key: &str, value: &str) -> Self {
        self.cmd.env(key, value);
        self
    }

    /// Start without waiting, output captured
    pub fn spawn(mut self) -> Child {
        self.cmd
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .unwrap()
    }

    pub fn passes(self) -> RunAssert {
        self.exits(0)
    }

    pub fn fails(mut self) -> RunAssert {
        let output = self.cmd.output().unwrap();
        assert!(
            !output.status.success(),
            "expected failure, got success\nstdout: {}",
            String::from_utf8_lossy(&output.stdout)
        );
        RunAssert { output }
    }

    pub fn exits(mut self, code: i32) -> RunAssert {
        let output = self.cmd.output().unwrap();
        assert_eq!(
            output.status.code(),
            Some(code),
            "unexpected exit status\nstdout: {}\nstderr: {}",
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        );
        RunAssert { output }
    }
}

/// Assertions over a finished invocation
pub struct RunAssert {
    output: Output,
}

impl RunAssert {
    pub fn stdout(&self) -> String {
        String::from_utf8_lossy(&self.output.stdout).into_owned()
    }

    pub fn stderr(&self) -> String {
        String::from_utf8_lossy(&self.output.stderr).into_owned()
    }

    pub fn stdout_eq(self, expected: &str) -> Self {
        similar_asserts::assert_eq!(self.stdout(), expected);
        self
    }

    pub fn stdout_has(self, needle: &str) -> Self {
        let stdout = self.stdout();
        assert!(stdout.contains(needle), "stdout missing {:?}:\n{}", needle, stdout);
        self
    }

    pub fn stderr_has(self, needle: &str) -> Self {
        let stderr = self.stderr();
        assert!(stderr.contains(needle), "stderr missing {:?}:\n{}", needle, stderr);
        self
    }
}

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! User-friendly error display with context and suggestions.

use std::fmt;
use std::path::Path;
use std::process::ExitCode;

/// Exit status for a lock that could not be obtained in time (EX_TEMPFAIL)
pub const EXIT_LOCK_UNAVAILABLE: u8 = 75;

/// Exit status for bad settings (EX_CONFIG)
pub const EXIT_CONFIG: u8 = 78;

/// Error with context and recovery suggestions for user-friendly display.
#[derive(Debug)]
pub struct CliError {
    /// What went wrong
    pub message: String,
    /// Why it might have happened
    pub context: Vec<String>,
    /// How to fix it
    pub suggestions: Vec<String>,
    code: u8,
}

impl CliError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            context: Vec::new(),
            suggestions: Vec::new(),
            code: 1,
        }
    }

    pub fn with_context(mut self, ctx: impl Into<String>) -> Self {
        self.context.push(ctx.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    pub fn with_code(mut self, code: u8) -> Self {
        self.code = code;
        self
    }

    pub fn exit_code(&self) -> ExitCode {
        ExitCode::from(self.code)
    }

    /// The lock stayed busy for every allowed attempt
    pub fn lock_unavailable(reason: impl fmt::Display, key: &str) -> Self {
        CliError::new(reason.to_string())
            .with_context(format!("Another process kept renewing the lease on '{}'", key))
            .with_suggestion(format!("See who holds it: tenure show --key {}", key))
            .with_suggestion("Allow more attempts with --attempts")
            .with_code(EXIT_LOCK_UNAVAILABLE)
    }

    /// Lease timing or owner settings were rejected
    pub fn invalid_settings(reason: impl fmt::Display, path: Option<&Path>) -> Self {
        let err = CliError::new(format!("invalid lease settings: {}", reason))
            .with_suggestion("The heartbeat must be shorter than the lease, e.g. --lease 10s --heartbeat 3s")
            .with_code(EXIT_CONFIG);
        match path {
            Some(path) => err.with_context(format!("Settings loaded from {}", path.display())),
            None => err,
        }
    }

    /// No directory to keep lease records in
    pub fn no_store_dir() -> Self {
        CliError::new("no lease store directory")
            .with_context("Neither --store nor TENURE_STORE is set and no state directory was found")
            .with_suggestion("Pass --store DIR or export TENURE_STORE=DIR")
            .with_code(EXIT_CONFIG)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "error: {}", self.message)?;

        if !self.context.is_empty() {
            writeln!(f)?;
            for ctx in &self.context {
                writeln!(f, "  -> {}", ctx)?;
            }
        }

        if !self.suggestions.is_empty() {
            writeln!(f)?;
            writeln!(f, "suggestions:")?;
            for (i, suggestion) in self.suggestions.iter().enumerate() {
                writeln!(f, "  {}. {}", i + 1, suggestion)?;
            }
        }

        Ok(())
    }
}

impl std::error::Error for CliError {}

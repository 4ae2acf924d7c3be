// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `tenure run --key <key> -- <command> [args]` - Run a command under the lock

use crate::error::CliError;
use crate::store::CliStore;
use anyhow::{Context, Result};
use clap::Args;
use std::process::{ExitCode, ExitStatus};
use std::time::Duration;
use tenure_core::{LeaseConfig, LockKey, OwnerId};
use tenure_engine::{AcquireError, LeaseLockFacilitator};

#[derive(Args)]
pub struct RunArgs {
    /// Partition key of the lock
    #[arg(long)]
    pub key: String,

    /// Sort key, for stores whose schema has one
    #[arg(long)]
    pub sort: Option<String>,

    /// Holder identity written into the lease
    #[arg(long)]
    pub owner: Option<String>,

    /// Lease duration (e.g. "10s", "500ms")
    #[arg(long, value_parser = humantime::parse_duration)]
    pub lease: Option<Duration>,

    /// Heartbeat interval, shorter than the lease
    #[arg(long, value_parser = humantime::parse_duration)]
    pub heartbeat: Option<Duration>,

    /// Acquisition attempts before giving up
    #[arg(long)]
    pub attempts: Option<u32>,

    /// Command to run while holding the lock
    #[arg(last = true, required = true)]
    pub command: Vec<String>,
}

impl RunArgs {
    pub fn lock_key(&self) -> LockKey {
        super::lock_key(&self.key, self.sort.as_deref())
    }

    /// Flags override the settings file
    pub fn apply(&self, mut config: LeaseConfig) -> LeaseConfig {
        if let Some(owner) = &self.owner {
            config.owner = OwnerId::new(owner);
        }
        if let Some(lease) = self.lease {
            config.lease_duration = lease;
        }
        if let Some(heartbeat) = self.heartbeat {
            config.heartbeat_interval = heartbeat;
        }
        if let Some(attempts) = self.attempts {
            config.max_acquisition_attempts = attempts;
        }
        config
    }
}

pub async fn run(args: RunArgs, settings: LeaseConfig, store: CliStore) -> Result<ExitCode> {
    let key = args.lock_key();
    let config = args.apply(settings);
    super::warn_if_sort_ignored(&key, &config.key_schema);
    let facilitator = LeaseLockFacilitator::new(config, store)
        .map_err(|e| CliError::invalid_settings(e, None))?;

    let (program, rest) = args
        .command
        .split_first()
        .context("no command given after --")?;

    let outcome = facilitator
        .execute_critical_section(&key, move || async move {
            tracing::info!(%program, "running command");
            tokio::process::Command::new(program)
                .args(rest)
                .status()
                .await
                .with_context(|| format!("failed to start {}", program))
        })
        .await;

    match outcome {
        Ok(status) => Ok(exit_code(status)),
        Err(e) => match e.downcast::<AcquireError>() {
            Ok(err) if err.is_exhausted() => {
                Err(CliError::lock_unavailable(&err, &key.to_string()).into())
            }
            Ok(err) => Err(anyhow::Error::new(err).context("lease store failed")),
            Err(e) => Err(e),
        },
    }
}

/// Pass the child's status through; a child killed by a signal counts as failure
fn exit_code(status: ExitStatus) -> ExitCode {
    match status.code() {
        Some(code) => ExitCode::from(u8::try_from(code).unwrap_or(1)),
        None => ExitCode::FAILURE,
    }
}

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Lease store factory for CLI commands

use crate::error::CliError;
use anyhow::{Context, Result};
use std::path::PathBuf;
use tenure_adapters::{FileLeaseStore, TracedLeaseStore};
use tenure_core::LeaseConfig;

pub type CliStore = TracedLeaseStore<FileLeaseStore>;

/// Open the file store at `explicit`, or under the user's state directory
pub fn open(explicit: Option<PathBuf>, settings: &LeaseConfig) -> Result<CliStore> {
    let dir = explicit
        .or_else(default_dir)
        .ok_or_else(CliError::no_store_dir)?;
    let store = FileLeaseStore::open(&dir, settings.key_schema.clone())
        .with_context(|| format!("failed to open lease store at {}", dir.display()))?;
    tracing::debug!(dir = %dir.display(), "lease store opened");
    Ok(TracedLeaseStore::new(store))
}

fn default_dir() -> Option<PathBuf> {
    dirs::state_dir()
        .or_else(dirs::data_local_dir)
        .map(|dir| dir.join("tenure"))
}

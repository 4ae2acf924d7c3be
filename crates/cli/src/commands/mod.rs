// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI command implementations

pub mod run;
pub mod show;

use crate::error::CliError;
use anyhow::{Context, Result};
use std::path::Path;
use tenure_core::{ConfigError, KeySchema, LeaseConfig, LockKey};

/// Lease settings from `--config`, or the defaults when none is given
pub fn load_settings(path: Option<&Path>) -> Result<LeaseConfig> {
    let Some(path) = path else {
        return Ok(LeaseConfig::default());
    };
    match LeaseConfig::load(path) {
        Ok(config) => Ok(config),
        Err(ConfigError::Io(e)) => {
            Err(e).with_context(|| format!("failed to read settings from {}", path.display()))
        }
        Err(e) => Err(CliError::invalid_settings(e, Some(path)).into()),
    }
}

/// The schema decides whether a sort key takes part in the record key
pub fn warn_if_sort_ignored(key: &LockKey, schema: &KeySchema) {
    if key.sort.is_some() && schema.sort_field.is_none() {
        tracing::warn!(%key, "sort key ignored: the key schema has no sort field");
    }
}

pub fn lock_key(partition: &str, sort: Option<&str>) -> LockKey {
    let key = LockKey::new(partition);
    match sort {
        Some(sort) => key.with_sort(sort),
        None => key,
    }
}

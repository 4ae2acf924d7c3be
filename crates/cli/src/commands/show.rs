// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `tenure show --key <key>` - Show who holds a lock

use crate::output::{self, OutputFormat};
use crate::store::CliStore;
use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;
use std::fmt;
use tenure_core::{LeaseConfig, LeaseRecord, LeaseStore, LockKey};

#[derive(Args)]
pub struct ShowArgs {
    /// Partition key of the lock
    #[arg(long)]
    pub key: String,

    /// Sort key, for stores whose schema has one
    #[arg(long)]
    pub sort: Option<String>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LeaseState {
    Free,
    Released,
    Held,
}

/// What the store currently says about one key
#[derive(Debug, Serialize)]
pub struct LeaseView {
    pub key: String,
    pub state: LeaseState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lease_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl LeaseView {
    pub fn new(key: &LockKey, record: Option<&LeaseRecord>) -> Self {
        let state = match record {
            None => LeaseState::Free,
            Some(r) if r.is_released() => LeaseState::Released,
            Some(_) => LeaseState::Held,
        };
        LeaseView {
            key: key.to_string(),
            state,
            owner: record.map(|r| r.owner.to_string()),
            lease_ms: record
                .map(|r| u64::try_from(r.lease_duration.as_millis()).unwrap_or(u64::MAX)),
            version: record.map(|r| r.version.to_string()),
        }
    }
}

impl fmt::Display for LeaseView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let owner = self.owner.as_deref().unwrap_or("-");
        let version = self.version.as_deref().unwrap_or("-");
        match self.state {
            LeaseState::Free => write!(f, "{}: free", self.key),
            LeaseState::Released => {
                write!(f, "{}: released by {} (version {})", self.key, owner, version)
            }
            LeaseState::Held => {
                let lease = std::time::Duration::from_millis(self.lease_ms.unwrap_or(0));
                write!(
                    f,
                    "{}: held by {}, lease {} (version {})",
                    self.key,
                    owner,
                    humantime::format_duration(lease),
                    version
                )
            }
        }
    }
}

pub async fn show(args: ShowArgs, settings: &LeaseConfig, store: &CliStore) -> Result<()> {
    let key = super::lock_key(&args.key, args.sort.as_deref());
    super::warn_if_sort_ignored(&key, &settings.key_schema);
    let record = store
        .read(&key)
        .await
        .with_context(|| format!("failed to read lease for {}", key))?;
    output::print(&LeaseView::new(&key, record.as_ref()), args.format);
    Ok(())
}

#[cfg(test)]
#[path = "show_tests.rs"]
mod tests;

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Lease store contract consumed by the lock engine

use crate::key::LockKey;
use crate::record::{Expectation, LeaseRecord};
use async_trait::async_trait;
use thiserror::Error;

/// Errors from lease store operations
#[derive(Debug, Error)]
pub enum StoreError {
    /// The precondition of a conditional write did not hold
    #[error("version conflict on {key}")]
    Conflict { key: String },
    #[error("store unavailable: {0}")]
    Unavailable(String),
    #[error("store operation timed out")]
    Timeout,
    #[error("corrupt record for {key}: {reason}")]
    Corrupt { key: String, reason: String },
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    pub fn conflict(key: &LockKey) -> Self {
        StoreError::Conflict {
            key: key.to_string(),
        }
    }

    /// Only a version conflict is retryable; everything else is a fault
    pub fn is_conflict(&self) -> bool {
        matches!(self, StoreError::Conflict { .. })
    }
}

/// Strongly consistent key-value store with compare-and-swap writes
#[async_trait]
pub trait LeaseStore: Clone + Send + Sync + 'static {
    /// Read the current record, reflecting the most recent committed write
    async fn read(&self, key: &LockKey) -> Result<Option<LeaseRecord>, StoreError>;

    /// Atomically write `record` iff the stored state satisfies `expected`.
    ///
    /// Fails with [`StoreError::Conflict`] when it does not.
    async fn conditional_write(
        &self,
        key: &LockKey,
        record: &LeaseRecord,
        expected: &Expectation,
    ) -> Result<(), StoreError>;
}

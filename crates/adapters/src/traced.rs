// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced store wrapper for consistent observability

use async_trait::async_trait;
use tenure_core::{Expectation, LeaseRecord, LeaseStore, LockKey, StoreError};
use tracing::Instrument;

/// Wrapper that adds tracing to any LeaseStore
#[derive(Clone)]
pub struct TracedLeaseStore<S> {
    inner: S,
}

impl<S> TracedLeaseStore<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }
}

#[async_trait]
impl<S: LeaseStore> LeaseStore for TracedLeaseStore<S> {
    async fn read(&self, key: &LockKey) -> Result<Option<LeaseRecord>, StoreError> {
        let span = tracing::debug_span!("store.read", %key);
        async {
            let start = std::time::Instant::now();
            let result = self.inner.read(key).await;
            let elapsed_ms = start.elapsed().as_millis() as u64;

            match &result {
                Ok(Some(record)) => tracing::trace!(
                    owner = %record.owner,
                    version = %record.version,
                    lease_ms = record.lease_duration.as_millis() as u64,
                    elapsed_ms,
                    "read"
                ),
                Ok(None) => tracing::trace!(elapsed_ms, "read: no record"),
                Err(e) => tracing::warn!(elapsed_ms, error = %e, "read failed"),
            }

            result
        }
        .instrument(span)
        .await
    }

    async fn conditional_write(
        &self,
        key: &LockKey,
        record: &LeaseRecord,
        expected: &Expectation,
    ) -> Result<(), StoreError> {
        let span = tracing::debug_span!(
            "store.conditional_write",
            %key,
            owner = %record.owner,
            version = %record.version,
            expected = ?expected,
        );
        async {
            let start = std::time::Instant::now();
            let result = self.inner.conditional_write(key, record, expected).await;
            let elapsed_ms = start.elapsed().as_millis() as u64;

            match &result {
                Ok(()) => tracing::trace!(elapsed_ms, "written"),
                // Conflicts are routine under contention
                Err(e) if e.is_conflict() => tracing::debug!(elapsed_ms, "conflict"),
                Err(e) => tracing::warn!(elapsed_ms, error = %e, "write failed"),
            }

            result
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;

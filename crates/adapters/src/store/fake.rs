// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake lease store for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::MemoryLeaseStore;
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tenure_core::{Expectation, KeySchema, LeaseRecord, LeaseStore, LockKey, StoreError};

/// Recorded store call
#[derive(Debug, Clone, PartialEq)]
pub enum StoreCall {
    Read {
        key: LockKey,
    },
    Write {
        key: LockKey,
        record: LeaseRecord,
        expected: Expectation,
        succeeded: bool,
    },
}

/// Injected failure mode for conditional writes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WriteFault {
    #[default]
    None,
    /// Every write reports a version conflict
    AlwaysConflict,
    /// Every write fails as if the store were down
    Unavailable,
    /// Writes expecting a specific version fail as if the store were down.
    /// Covers renewals, steals, and releases while fresh acquisitions succeed.
    UnavailableForVersioned,
}

/// Fake lease store with call recording and fault injection
#[derive(Clone, Default)]
pub struct FakeLeaseStore {
    inner: MemoryLeaseStore,
    calls: Arc<Mutex<Vec<StoreCall>>>,
    fault: Arc<Mutex<WriteFault>>,
    reads_fail: Arc<AtomicBool>,
    latency: Arc<Mutex<Duration>>,
}

impl FakeLeaseStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_schema(schema: KeySchema) -> Self {
        Self {
            inner: MemoryLeaseStore::new(schema),
            ..Self::default()
        }
    }

    pub fn set_write_fault(&self, fault: WriteFault) {
        *self.fault.lock().unwrap_or_else(|e| e.into_inner()) = fault;
    }

    pub fn fail_reads(&self, fail: bool) {
        self.reads_fail.store(fail, Ordering::SeqCst);
    }

    /// Delay applied to every call, measured on the tokio clock
    pub fn set_latency(&self, latency: Duration) {
        *self.latency.lock().unwrap_or_else(|e| e.into_inner()) = latency;
    }

    /// Seed a record without recording a call
    pub fn put(&self, key: &LockKey, record: LeaseRecord) {
        self.inner.put(key, record);
    }

    /// Current record for a key, without recording a call
    pub fn record(&self, key: &LockKey) -> Option<LeaseRecord> {
        self.inner.get(key)
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<StoreCall> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Number of conditional writes attempted, successful or not
    pub fn write_attempts(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, StoreCall::Write { .. }))
            .count()
    }

    /// Records written by successful conditional writes, in order
    pub fn successful_writes(&self) -> Vec<LeaseRecord> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                StoreCall::Write {
                    record,
                    succeeded: true,
                    ..
                } => Some(record),
                _ => None,
            })
            .collect()
    }

    fn push(&self, call: StoreCall) {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(call);
    }

    async fn delay(&self) {
        let latency = *self.latency.lock().unwrap_or_else(|e| e.into_inner());
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }
    }
}

#[async_trait]
impl LeaseStore for FakeLeaseStore {
    async fn read(&self, key: &LockKey) -> Result<Option<LeaseRecord>, StoreError> {
        self.delay().await;
        self.push(StoreCall::Read { key: key.clone() });
        if self.reads_fail.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("injected read failure".to_string()));
        }
        Ok(self.inner.get(key))
    }

    async fn conditional_write(
        &self,
        key: &LockKey,
        record: &LeaseRecord,
        expected: &Expectation,
    ) -> Result<(), StoreError> {
        self.delay().await;
        let fault = *self.fault.lock().unwrap_or_else(|e| e.into_inner());
        let result = match (fault, expected) {
            (WriteFault::None, _) => self.inner.compare_and_swap(key, record, expected),
            (WriteFault::AlwaysConflict, _) => Err(StoreError::conflict(key)),
            (WriteFault::Unavailable, _) => {
                Err(StoreError::Unavailable("injected write failure".to_string()))
            }
            (WriteFault::UnavailableForVersioned, Expectation::Version(_)) => Err(
                StoreError::Unavailable("injected versioned write failure".to_string()),
            ),
            (WriteFault::UnavailableForVersioned, Expectation::Absent) => {
                self.inner.compare_and_swap(key, record, expected)
            }
        };
        self.push(StoreCall::Write {
            key: key.clone(),
            record: record.clone(),
            expected: expected.clone(),
            succeeded: result.is_ok(),
        });
        result
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;

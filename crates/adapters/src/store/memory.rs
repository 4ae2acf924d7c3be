// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-process lease store
//!
//! Linearizable for every clone within one process. Useful when all
//! contenders share an address space, and as the backing state of the fake.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tenure_core::{Expectation, KeySchema, LeaseRecord, LeaseStore, LockKey, StoreError};

/// Lease store kept in a shared map
#[derive(Clone, Default)]
pub struct MemoryLeaseStore {
    schema: KeySchema,
    records: Arc<Mutex<HashMap<String, LeaseRecord>>>,
}

impl MemoryLeaseStore {
    pub fn new(schema: KeySchema) -> Self {
        Self {
            schema,
            records: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn schema(&self) -> &KeySchema {
        &self.schema
    }

    /// Current record for a key
    pub fn get(&self, key: &LockKey) -> Option<LeaseRecord> {
        let item_key = self.schema.item_key(key);
        self.records
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(&item_key)
            .cloned()
    }

    /// Overwrite a record unconditionally
    pub fn put(&self, key: &LockKey, record: LeaseRecord) {
        let item_key = self.schema.item_key(key);
        self.records
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(item_key, record);
    }

    /// Number of keys with a stored record
    pub fn len(&self) -> usize {
        self.records.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Check-and-set under a single map lock
    pub fn compare_and_swap(
        &self,
        key: &LockKey,
        record: &LeaseRecord,
        expected: &Expectation,
    ) -> Result<(), StoreError> {
        let item_key = self.schema.item_key(key);
        let mut records = self.records.lock().unwrap_or_else(|e| e.into_inner());
        if !expected.matches(records.get(&item_key)) {
            return Err(StoreError::conflict(key));
        }
        records.insert(item_key, record.clone());
        Ok(())
    }
}

#[async_trait]
impl LeaseStore for MemoryLeaseStore {
    async fn read(&self, key: &LockKey) -> Result<Option<LeaseRecord>, StoreError> {
        Ok(self.get(key))
    }

    async fn conditional_write(
        &self,
        key: &LockKey,
        record: &LeaseRecord,
        expected: &Expectation,
    ) -> Result<(), StoreError> {
        self.compare_and_swap(key, record, expected)
    }
}

#[cfg(test)]
#[path = "memory_tests.rs"]
mod tests;

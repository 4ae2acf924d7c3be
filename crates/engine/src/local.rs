// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-process keyed lock
//!
//! Same contract as the lease facilitator for callers that only need
//! exclusion inside one process. Acquisition waits as long as it takes and
//! never fails.

use crate::error::AcquireError;
use crate::facilitator::LockFacilitator;
use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;
use std::sync::{Arc, Mutex};
use tokio::sync::Mutex as AsyncMutex;

type Entries<K> = Mutex<HashMap<K, Arc<AsyncMutex<()>>>>;

/// Keyed async mutex with per-key entries
pub struct LocalLockFacilitator<K> {
    entries: Arc<Entries<K>>,
}

impl<K> Clone for LocalLockFacilitator<K> {
    fn clone(&self) -> Self {
        Self {
            entries: Arc::clone(&self.entries),
        }
    }
}

impl<K> Default for LocalLockFacilitator<K> {
    fn default() -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

impl<K: Eq + Hash + Clone> LocalLockFacilitator<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keys currently held or waited on
    pub fn active_keys(&self) -> usize {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    fn checkout<'a>(&'a self, key: &'a K) -> Slot<'a, K> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        let entry = entries
            .entry(key.clone())
            .or_insert_with(|| Arc::new(AsyncMutex::new(())))
            .clone();
        Slot {
            entries: &self.entries,
            key,
            entry,
        }
    }
}

/// One caller's interest in a key. The entry is dropped from the map when
/// the last interested caller lets go.
struct Slot<'a, K: Eq + Hash> {
    entries: &'a Entries<K>,
    key: &'a K,
    entry: Arc<AsyncMutex<()>>,
}

impl<K: Eq + Hash> Drop for Slot<'_, K> {
    fn drop(&mut self) {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        // Ours plus the map's; new references are only taken under this lock
        if Arc::strong_count(&self.entry) == 2 {
            entries.remove(self.key);
        }
    }
}

impl<K> LockFacilitator<K> for LocalLockFacilitator<K>
where
    K: Eq + Hash + Clone + Send + Sync,
{
    fn execute_critical_section<T, E, F, Fut>(
        &self,
        key: &K,
        section: F,
    ) -> impl Future<Output = Result<T, E>> + Send
    where
        T: Send,
        E: From<AcquireError> + Send,
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = Result<T, E>> + Send,
    {
        async move {
            let slot = self.checkout(key);
            let _held = slot.entry.lock().await;
            section().await
        }
    }
}

#[cfg(test)]
#[path = "local_tests.rs"]
mod tests;

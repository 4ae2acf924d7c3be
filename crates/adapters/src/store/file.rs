// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! File-backed lease store
//!
//! One JSON document per key. Every operation holds an exclusive advisory
//! lock on the directory's lock file, which makes reads and conditional
//! writes linearizable for all processes on the same host.

use async_trait::async_trait;
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tenure_core::{
    Expectation, KeySchema, KeyValue, LeaseRecord, LeaseStore, LockKey, OwnerId, StoreError,
    VersionToken,
};

const LOCK_FILE: &str = ".tenure.lock";

/// Serializable form of a lease record
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredLease {
    /// Key fields as mapped by the schema, kept for inspection
    fields: BTreeMap<String, KeyValue>,
    owner: String,
    lease_duration_ms: u64,
    version: String,
}

impl StoredLease {
    fn from_record(fields: Vec<(String, KeyValue)>, record: &LeaseRecord) -> Self {
        StoredLease {
            fields: fields.into_iter().collect(),
            owner: record.owner.0.clone(),
            lease_duration_ms: stored_millis(record.lease_duration),
            version: record.version.0.clone(),
        }
    }

    fn to_record(&self) -> LeaseRecord {
        LeaseRecord::leased(
            OwnerId::new(&self.owner),
            Duration::from_millis(self.lease_duration_ms),
            VersionToken::new(&self.version),
        )
    }
}

/// Milliseconds, rounded up so a live lease never reads back as released
fn stored_millis(duration: Duration) -> u64 {
    let millis = duration.as_nanos().div_ceil(1_000_000);
    u64::try_from(millis).unwrap_or(u64::MAX)
}

/// Lease store persisted as JSON files in a directory
#[derive(Clone)]
pub struct FileLeaseStore {
    dir: PathBuf,
    schema: KeySchema,
}

impl FileLeaseStore {
    /// Open a store at the given directory, creating it if needed
    pub fn open(dir: impl Into<PathBuf>, schema: KeySchema) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir, schema })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &LockKey) -> PathBuf {
        let mut hasher = Sha256::new();
        hasher.update(self.schema.item_key(key).as_bytes());
        let digest = hasher.finalize();
        self.dir.join(format!("{}.json", hex_encode(&digest[..16])))
    }

    /// Run `f` while holding the store-wide exclusive lock
    fn exclusive<T>(&self, f: impl FnOnce() -> Result<T, StoreError>) -> Result<T, StoreError> {
        let lock_file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(self.dir.join(LOCK_FILE))?;
        FileExt::lock_exclusive(&lock_file)?;
        let result = f();
        // Released on close as well; an unlock failure is not worth masking the result
        let _ = FileExt::unlock(&lock_file);
        result
    }

    fn load(&self, key: &LockKey) -> Result<Option<LeaseRecord>, StoreError> {
        let path = self.path_for(key);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let stored: StoredLease =
            serde_json::from_str(&content).map_err(|e| StoreError::Corrupt {
                key: key.to_string(),
                reason: e.to_string(),
            })?;
        Ok(Some(stored.to_record()))
    }

    fn save(&self, key: &LockKey, record: &LeaseRecord) -> Result<(), StoreError> {
        let path = self.path_for(key);
        let stored = StoredLease::from_record(self.schema.fields(key), record);
        let json = serde_json::to_string_pretty(&stored).map_err(|e| StoreError::Corrupt {
            key: key.to_string(),
            reason: e.to_string(),
        })?;
        let tmp = path.with_extension("json.tmp");
        {
            let mut file = File::create(&tmp)?;
            std::io::Write::write_all(&mut file, json.as_bytes())?;
            file.sync_all()?;
        }
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    /// Blocking read under the store lock
    pub fn read_blocking(&self, key: &LockKey) -> Result<Option<LeaseRecord>, StoreError> {
        self.exclusive(|| self.load(key))
    }

    /// Blocking conditional write under the store lock
    pub fn conditional_write_blocking(
        &self,
        key: &LockKey,
        record: &LeaseRecord,
        expected: &Expectation,
    ) -> Result<(), StoreError> {
        self.exclusive(|| {
            let current = self.load(key)?;
            if !expected.matches(current.as_ref()) {
                return Err(StoreError::conflict(key));
            }
            self.save(key, record)
        })
    }
}

#[async_trait]
impl LeaseStore for FileLeaseStore {
    async fn read(&self, key: &LockKey) -> Result<Option<LeaseRecord>, StoreError> {
        let store = self.clone();
        let key = key.clone();
        tokio::task::spawn_blocking(move || store.read_blocking(&key))
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?
    }

    async fn conditional_write(
        &self,
        key: &LockKey,
        record: &LeaseRecord,
        expected: &Expectation,
    ) -> Result<(), StoreError> {
        let store = self.clone();
        let key = key.clone();
        let record = record.clone();
        let expected = expected.clone();
        tokio::task::spawn_blocking(move || {
            store.conditional_write_blocking(&key, &record, &expected)
        })
        .await
        .map_err(|e| StoreError::Unavailable(e.to_string()))?
    }
}

// Hex encoding helper
fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

#[cfg(test)]
#[path = "file_tests.rs"]
mod tests;

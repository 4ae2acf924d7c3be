// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! tenure-core: data model and store contract for lease-based locking
//!
//! This crate provides:
//! - Lock keys and the schema mapping them onto store fields
//! - Lease records, owner ids, and version tokens
//! - Lease configuration loaded from TOML
//! - The compare-and-swap store contract the engine runs against

pub mod config;
pub mod key;
pub mod record;
pub mod store;
pub mod version;

pub use config::{ConfigError, LeaseConfig};
pub use key::{KeySchema, KeyValue, LockKey};
pub use record::{Expectation, LeaseRecord, OwnerId, VersionToken, RELEASED_LEASE_DURATION};
pub use store::{LeaseStore, StoreError};
pub use version::{SequentialVersionGen, UuidVersionGen, VersionGen};

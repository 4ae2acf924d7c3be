// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Persisted lease state for a single key

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Lease duration written on release so the next contender does not wait
pub const RELEASED_LEASE_DURATION: Duration = Duration::ZERO;

/// Identifies the process that holds (or last held) a lease
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OwnerId(pub String);

impl OwnerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Random owner id for processes that were not given one
    pub fn generate() -> Self {
        Self(format!("owner-{}", uuid::Uuid::new_v4()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque token replaced on every successful write of a record
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VersionToken(pub String);

impl VersionToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

impl fmt::Display for VersionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The record stored for a key.
///
/// There is no expiry timestamp. Contenders judge liveness by waiting
/// `lease_duration` and checking whether `version` moved in the meantime.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LeaseRecord {
    pub owner: OwnerId,
    pub lease_duration: Duration,
    pub version: VersionToken,
}

impl LeaseRecord {
    pub fn leased(owner: OwnerId, lease_duration: Duration, version: VersionToken) -> Self {
        Self {
            owner,
            lease_duration,
            version,
        }
    }

    /// Sentinel record marking a lease as given up
    pub fn released(owner: OwnerId, version: VersionToken) -> Self {
        Self::leased(owner, RELEASED_LEASE_DURATION, version)
    }

    pub fn is_released(&self) -> bool {
        self.lease_duration == RELEASED_LEASE_DURATION
    }
}

/// Precondition for a conditional write
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Expectation {
    /// No record may exist for the key
    Absent,
    /// The stored record must carry exactly this version
    Version(VersionToken),
}

impl Expectation {
    /// Precondition matching what a read observed
    pub fn for_observed(observed: Option<&LeaseRecord>) -> Self {
        match observed {
            Some(record) => Expectation::Version(record.version.clone()),
            None => Expectation::Absent,
        }
    }

    /// Whether a stored record satisfies this precondition
    pub fn matches(&self, current: Option<&LeaseRecord>) -> bool {
        match (self, current) {
            (Expectation::Absent, None) => true,
            (Expectation::Version(expected), Some(record)) => &record.version == expected,
            _ => false,
        }
    }
}

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Lease configuration
//!
//! Passed explicitly to each facilitator. Durations use humantime syntax
//! (`"10s"`, `"250ms"`) when loaded from TOML.

use crate::key::KeySchema;
use crate::record::OwnerId;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

const DEFAULT_LEASE_DURATION: Duration = Duration::from_secs(10);
const DEFAULT_HEARTBEAT_INTERVAL: Duration = Duration::from_secs(3);
const DEFAULT_MAX_ACQUISITION_ATTEMPTS: u32 = 10;

/// Errors from loading or validating a [`LeaseConfig`]
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("owner must not be empty")]
    EmptyOwner,
    #[error("lease duration must be greater than zero")]
    ZeroLeaseDuration,
    #[error("heartbeat interval must be greater than zero")]
    ZeroHeartbeatInterval,
    #[error("{field} ({value:?}) must be a whole number of milliseconds")]
    SubMillisecond { field: &'static str, value: Duration },
    #[error("max acquisition attempts must be at least 1")]
    ZeroAttempts,
    #[error(
        "heartbeat interval ({heartbeat:?}) must be shorter than lease duration ({lease:?}); \
         contenders would steal a live lease"
    )]
    HeartbeatNotShorterThanLease { heartbeat: Duration, lease: Duration },
}

/// Settings for one lock facilitator
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaseConfig {
    /// Identifies this process as lease holder
    #[serde(default = "OwnerId::generate")]
    pub owner: OwnerId,
    /// How long a holder intends to hold before renewing; also the passive wait
    /// contenders observe
    #[serde(with = "humantime_serde", default = "default_lease_duration")]
    pub lease_duration: Duration,
    /// Renewal cadence while a critical section runs
    #[serde(with = "humantime_serde", default = "default_heartbeat_interval")]
    pub heartbeat_interval: Duration,
    #[serde(default = "default_max_acquisition_attempts")]
    pub max_acquisition_attempts: u32,
    #[serde(default)]
    pub key_schema: KeySchema,
}

fn default_lease_duration() -> Duration {
    DEFAULT_LEASE_DURATION
}

fn default_heartbeat_interval() -> Duration {
    DEFAULT_HEARTBEAT_INTERVAL
}

fn default_max_acquisition_attempts() -> u32 {
    DEFAULT_MAX_ACQUISITION_ATTEMPTS
}

impl Default for LeaseConfig {
    fn default() -> Self {
        Self::new(OwnerId::generate())
    }
}

impl LeaseConfig {
    pub fn new(owner: OwnerId) -> Self {
        Self {
            owner,
            lease_duration: DEFAULT_LEASE_DURATION,
            heartbeat_interval: DEFAULT_HEARTBEAT_INTERVAL,
            max_acquisition_attempts: DEFAULT_MAX_ACQUISITION_ATTEMPTS,
            key_schema: KeySchema::default(),
        }
    }

    pub fn with_lease_duration(mut self, duration: Duration) -> Self {
        self.lease_duration = duration;
        self
    }

    pub fn with_heartbeat_interval(mut self, interval: Duration) -> Self {
        self.heartbeat_interval = interval;
        self
    }

    pub fn with_max_acquisition_attempts(mut self, attempts: u32) -> Self {
        self.max_acquisition_attempts = attempts;
        self
    }

    pub fn with_key_schema(mut self, schema: KeySchema) -> Self {
        self.key_schema = schema;
        self
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load a config file. Unset fields take their defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Reject settings under which the protocol cannot keep mutual exclusion.
    ///
    /// A holder must renew at least once within its advertised lease duration,
    /// otherwise a contender's passive wait sees no version change and steals
    /// a lease whose holder is still alive.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.owner.as_str().is_empty() {
            return Err(ConfigError::EmptyOwner);
        }
        if self.lease_duration.is_zero() {
            return Err(ConfigError::ZeroLeaseDuration);
        }
        if self.heartbeat_interval.is_zero() {
            return Err(ConfigError::ZeroHeartbeatInterval);
        }
        whole_millis("lease duration", self.lease_duration)?;
        whole_millis("heartbeat interval", self.heartbeat_interval)?;
        if self.max_acquisition_attempts == 0 {
            return Err(ConfigError::ZeroAttempts);
        }
        if self.heartbeat_interval >= self.lease_duration {
            return Err(ConfigError::HeartbeatNotShorterThanLease {
                heartbeat: self.heartbeat_interval,
                lease: self.lease_duration,
            });
        }
        Ok(())
    }

    /// Number of whole heartbeats that fit in one lease duration
    pub fn heartbeats_per_lease(&self) -> u128 {
        self.lease_duration
            .as_nanos()
            .checked_div(self.heartbeat_interval.as_nanos())
            .unwrap_or(0)
    }
}

/// Stores record lease durations in milliseconds
fn whole_millis(field: &'static str, value: Duration) -> Result<(), ConfigError> {
    if value.subsec_nanos() % 1_000_000 != 0 {
        return Err(ConfigError::SubMillisecond { field, value });
    }
    Ok(())
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;

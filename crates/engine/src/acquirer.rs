// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Lease acquisition
//!
//! Each attempt reads the current record, waits out its advertised lease
//! duration, then tries to replace it with a compare-and-swap on the version
//! observed *before* the wait. A holder that is alive renews during the wait,
//! which changes the version and makes the swap fail.

use crate::error::AcquireError;
use std::time::Duration;
use tenure_core::{
    Expectation, LeaseConfig, LeaseRecord, LeaseStore, LockKey, OwnerId, VersionGen,
};

/// A lease this process holds
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HeldLease {
    pub key: LockKey,
    pub record: LeaseRecord,
}

/// Runs the bounded acquisition loop against a store
#[derive(Clone)]
pub struct Acquirer<S, V> {
    store: S,
    version_gen: V,
    owner: OwnerId,
    lease_duration: Duration,
    max_attempts: u32,
}

impl<S: LeaseStore, V: VersionGen> Acquirer<S, V> {
    pub fn new(store: S, version_gen: V, config: &LeaseConfig) -> Self {
        Self {
            store,
            version_gen,
            owner: config.owner.clone(),
            lease_duration: config.lease_duration,
            max_attempts: config.max_acquisition_attempts,
        }
    }

    /// Acquire the lease for `key`.
    ///
    /// Conflicts are retried up to the attempt budget. Any other store error
    /// aborts immediately.
    pub async fn acquire(&self, key: &LockKey) -> Result<HeldLease, AcquireError> {
        for attempt in 1..=self.max_attempts {
            let observed = self.store.read(key).await?;

            if let Some(current) = observed.as_ref().filter(|r| !r.is_released()) {
                tracing::debug!(
                    %key,
                    attempt,
                    holder = %current.owner,
                    wait_ms = current.lease_duration.as_millis() as u64,
                    "lease held, waiting out its duration"
                );
                tokio::time::sleep(current.lease_duration).await;
            }

            let candidate = LeaseRecord::leased(
                self.owner.clone(),
                self.lease_duration,
                self.version_gen.next(),
            );
            let expected = Expectation::for_observed(observed.as_ref());

            match self.store.conditional_write(key, &candidate, &expected).await {
                Ok(()) => {
                    match observed.filter(|r| !r.is_released()) {
                        Some(previous) => tracing::info!(
                            %key,
                            attempt,
                            previous_holder = %previous.owner,
                            version = %candidate.version,
                            "stole lease from unresponsive holder"
                        ),
                        None => tracing::info!(
                            %key,
                            attempt,
                            version = %candidate.version,
                            "acquired lease"
                        ),
                    }
                    return Ok(HeldLease {
                        key: key.clone(),
                        record: candidate,
                    });
                }
                Err(e) if e.is_conflict() => {
                    tracing::debug!(%key, attempt, "lease changed underneath us, retrying");
                }
                Err(e) => {
                    tracing::error!(%key, attempt, error = %e, "store fault during acquisition");
                    return Err(AcquireError::Store(e));
                }
            }
        }

        tracing::warn!(%key, attempts = self.max_attempts, "acquisition attempts exhausted");
        Err(AcquireError::Exhausted {
            key: key.to_string(),
            attempts: self.max_attempts,
        })
    }
}

#[cfg(test)]
#[path = "acquirer_tests.rs"]
mod tests;

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Running work inside a held lease
//!
//! The facilitator ties the pieces together: acquire, keep the lease alive
//! while the section runs, then hand the lock back.

use crate::acquirer::Acquirer;
use crate::error::AcquireError;
use crate::maintainer::Maintainer;
use std::future::Future;
use std::sync::Arc;
use tenure_core::{
    ConfigError, Expectation, LeaseConfig, LeaseRecord, LeaseStore, LockKey, UuidVersionGen,
    VersionGen, VersionToken,
};
use tracing::Instrument;

/// Runs async work under mutual exclusion for a key of type `K`
pub trait LockFacilitator<K: ?Sized + Sync>: Send + Sync {
    /// Run `section` while holding the lock for `key`.
    ///
    /// The section's own result is returned unchanged. Failing to obtain the
    /// lock surfaces as `E::from(AcquireError)` and the section never runs.
    fn execute_critical_section<T, E, F, Fut>(
        &self,
        key: &K,
        section: F,
    ) -> impl Future<Output = Result<T, E>> + Send
    where
        T: Send,
        E: From<AcquireError> + Send,
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = Result<T, E>> + Send;
}

/// Lock facilitator backed by a lease store shared between processes
#[derive(Clone)]
pub struct LeaseLockFacilitator<S, V = UuidVersionGen> {
    config: LeaseConfig,
    store: S,
    version_gen: V,
}

impl<S: LeaseStore> LeaseLockFacilitator<S> {
    pub fn new(config: LeaseConfig, store: S) -> Result<Self, ConfigError> {
        config.validate()?;
        if config.heartbeats_per_lease() < 2 {
            tracing::warn!(
                lease_ms = config.lease_duration.as_millis() as u64,
                heartbeat_ms = config.heartbeat_interval.as_millis() as u64,
                "fewer than two heartbeats fit in one lease, a slow renewal may lose the lock"
            );
        }
        Ok(Self {
            config,
            store,
            version_gen: UuidVersionGen,
        })
    }
}

impl<S: LeaseStore, V: VersionGen> LeaseLockFacilitator<S, V> {
    /// Swap the source of version tokens
    pub fn with_version_gen<V2: VersionGen>(
        self,
        version_gen: V2,
    ) -> LeaseLockFacilitator<S, V2> {
        LeaseLockFacilitator {
            config: self.config,
            store: self.store,
            version_gen,
        }
    }

    pub fn config(&self) -> &LeaseConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Acquire the lease for `key`, run `section`, then release.
    ///
    /// Heartbeats run beside the section. If one fails the section keeps
    /// going; the loss is only logged.
    pub async fn execute_critical_section<T, E, F, Fut>(
        &self,
        key: &LockKey,
        section: F,
    ) -> Result<T, E>
    where
        E: From<AcquireError>,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let span = tracing::info_span!("critical_section", %key, owner = %self.config.owner);
        async move {
            let held = Acquirer::new(self.store.clone(), self.version_gen.clone(), &self.config)
                .acquire(key)
                .await?;

            let heartbeat = Maintainer::new(
                self.store.clone(),
                self.version_gen.clone(),
                key.clone(),
                &self.config,
            )
            .spawn(&held.record);

            let result = section().await;

            let outcome = heartbeat.stop().await;
            if outcome.is_lost() {
                tracing::warn!(
                    renewals = outcome.renewals,
                    "lease was not renewed for the whole critical section"
                );
            }
            self.release(key, outcome.last_version).await;

            result
        }
        .instrument(span)
        .await
    }

    /// Best effort: a failed release only delays the next holder by one lease
    async fn release(&self, key: &LockKey, last_version: VersionToken) {
        let sentinel = LeaseRecord::released(self.config.owner.clone(), self.version_gen.next());
        let expected = Expectation::Version(last_version);

        match self
            .store
            .conditional_write(key, &sentinel, &expected)
            .await
        {
            Ok(()) => tracing::info!(version = %sentinel.version, "lease released"),
            Err(e) if e.is_conflict() => {
                tracing::warn!("lease was taken over before release, leaving it alone")
            }
            Err(e) => tracing::warn!(error = %e, "release failed, lease will expire on its own"),
        }
    }
}

impl<S: LeaseStore, V: VersionGen> LockFacilitator<LockKey> for LeaseLockFacilitator<S, V> {
    fn execute_critical_section<T, E, F, Fut>(
        &self,
        key: &LockKey,
        section: F,
    ) -> impl Future<Output = Result<T, E>> + Send
    where
        T: Send,
        E: From<AcquireError> + Send,
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = Result<T, E>> + Send,
    {
        LeaseLockFacilitator::execute_critical_section(self, key, section)
    }
}

impl<K, L> LockFacilitator<K> for Arc<L>
where
    K: ?Sized + Sync,
    L: LockFacilitator<K>,
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
        L::execute_critical_section(self, key, section)
    }
}

#[cfg(test)]
#[path = "facilitator_tests.rs"]
mod tests;

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Background lease renewal
//!
//! While a critical section runs, a spawned task renews the lease every
//! heartbeat interval. The first failed renewal ends the task. Losing the
//! heartbeat never interrupts the critical section itself.

use std::time::Duration;
use tenure_core::{
    Expectation, LeaseConfig, LeaseRecord, LeaseStore, LockKey, OwnerId, StoreError, VersionGen,
    VersionToken,
};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

/// Why the renewal loop ended
#[derive(Debug)]
pub enum MaintenanceEnd {
    /// The holder asked it to stop
    Stopped,
    /// A renewal failed; the lease may now be taken by someone else
    Lost(StoreError),
}

/// Summary of one renewal loop
#[derive(Debug)]
pub struct MaintenanceOutcome {
    pub renewals: u32,
    /// Version of the last successful write, used to release the lease
    pub last_version: VersionToken,
    pub ended: MaintenanceEnd,
}

impl MaintenanceOutcome {
    pub fn is_lost(&self) -> bool {
        matches!(self.ended, MaintenanceEnd::Lost(_))
    }
}

/// Renews one held lease
pub struct Maintainer<S, V> {
    store: S,
    version_gen: V,
    key: LockKey,
    owner: OwnerId,
    lease_duration: Duration,
    heartbeat_interval: Duration,
}

/// Handle to a running renewal loop.
///
/// Dropping the handle also stops the loop, without waiting for it.
pub struct MaintainerHandle {
    stop: oneshot::Sender<()>,
    task: JoinHandle<MaintenanceOutcome>,
    seed_version: VersionToken,
}

impl MaintainerHandle {
    /// Stop renewing and wait for any in-flight renewal to settle
    pub async fn stop(self) -> MaintenanceOutcome {
        let MaintainerHandle {
            stop,
            task,
            seed_version,
        } = self;
        // The loop may already have ended on a failed renewal
        let _ = stop.send(());

        match task.await {
            Ok(outcome) => outcome,
            Err(e) => MaintenanceOutcome {
                renewals: 0,
                last_version: seed_version,
                ended: MaintenanceEnd::Lost(StoreError::Unavailable(format!(
                    "heartbeat task failed: {}",
                    e
                ))),
            },
        }
    }
}

impl<S: LeaseStore, V: VersionGen> Maintainer<S, V> {
    pub fn new(store: S, version_gen: V, key: LockKey, config: &LeaseConfig) -> Self {
        Self {
            store,
            version_gen,
            key,
            owner: config.owner.clone(),
            lease_duration: config.lease_duration,
            heartbeat_interval: config.heartbeat_interval,
        }
    }

    /// Start renewing `held` on the current runtime
    pub fn spawn(self, held: &LeaseRecord) -> MaintainerHandle {
        let (stop, stopped) = oneshot::channel();
        let seed_version = held.version.clone();
        let task = tokio::spawn(self.run(seed_version.clone(), stopped));
        MaintainerHandle {
            stop,
            task,
            seed_version,
        }
    }

    async fn run(
        self,
        mut version: VersionToken,
        mut stopped: oneshot::Receiver<()>,
    ) -> MaintenanceOutcome {
        let mut renewals = 0;

        loop {
            // A dropped sender resolves `stopped` as well
            tokio::select! {
                biased;
                _ = &mut stopped => {
                    tracing::trace!(key = %self.key, renewals, "heartbeat stopped");
                    return MaintenanceOutcome {
                        renewals,
                        last_version: version,
                        ended: MaintenanceEnd::Stopped,
                    };
                }
                _ = tokio::time::sleep(self.heartbeat_interval) => {}
            }

            let renewed = LeaseRecord::leased(
                self.owner.clone(),
                self.lease_duration,
                self.version_gen.next(),
            );
            let expected = Expectation::Version(version.clone());

            match self
                .store
                .conditional_write(&self.key, &renewed, &expected)
                .await
            {
                Ok(()) => {
                    renewals += 1;
                    version = renewed.version;
                    tracing::debug!(key = %self.key, %version, renewals, "lease renewed");
                }
                Err(e) => {
                    tracing::warn!(
                        key = %self.key,
                        error = %e,
                        renewals,
                        "heartbeat lost, critical section continues without renewal"
                    );
                    return MaintenanceOutcome {
                        renewals,
                        last_version: version,
                        ended: MaintenanceEnd::Lost(e),
                    };
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "maintainer_tests.rs"]
mod tests;

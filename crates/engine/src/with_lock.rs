// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Call-site wrapper that derives the lock key from the call's arguments

use crate::error::AcquireError;
use crate::facilitator::LockFacilitator;
use std::future::Future;

/// Runs work under the lock for the key its arguments map to.
///
/// ```ignore
/// let debit = WithLock::new(facilitator, |t: &Transfer| LockKey::new(t.account.clone()));
/// debit.call(transfer, |t| async move { ledger.apply(t).await }).await?;
/// ```
#[derive(Clone)]
pub struct WithLock<L, KF> {
    facilitator: L,
    key_of: KF,
}

impl<L, KF> WithLock<L, KF> {
    pub fn new(facilitator: L, key_of: KF) -> Self {
        Self {
            facilitator,
            key_of,
        }
    }

    pub fn facilitator(&self) -> &L {
        &self.facilitator
    }

    /// Extract the key from `args`, then run `work(args)` while holding it
    pub async fn call<A, K, T, E, W, Fut>(&self, args: A, work: W) -> Result<T, E>
    where
        KF: Fn(&A) -> K,
        K: Sync,
        L: LockFacilitator<K>,
        A: Send,
        T: Send,
        E: From<AcquireError> + Send,
        W: FnOnce(A) -> Fut + Send,
        Fut: Future<Output = Result<T, E>> + Send,
    {
        let key = (self.key_of)(&args);
        self.facilitator
            .execute_critical_section(&key, move || work(args))
            .await
    }
}

#[cfg(test)]
#[path = "with_lock_tests.rs"]
mod tests;

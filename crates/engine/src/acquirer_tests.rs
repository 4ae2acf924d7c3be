// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::maintainer::Maintainer;
use std::time::Duration;
use tenure_adapters::{FakeLeaseStore, StoreCall, WriteFault};
use tenure_core::{SequentialVersionGen, StoreError, VersionToken};
use tokio::time::Instant;

fn config(owner: &str) -> LeaseConfig {
    LeaseConfig::new(OwnerId::new(owner))
        .with_lease_duration(Duration::from_millis(200))
        .with_heartbeat_interval(Duration::from_millis(50))
        .with_max_acquisition_attempts(3)
}

fn acquirer(
    store: &FakeLeaseStore,
    config: &LeaseConfig,
) -> Acquirer<FakeLeaseStore, SequentialVersionGen> {
    Acquirer::new(store.clone(), SequentialVersionGen::new("v"), config)
}

#[tokio::test(start_paused = true)]
async fn free_lock_is_acquired_with_one_read_and_one_write() {
    let store = FakeLeaseStore::new();
    let key = LockKey::new("orders");
    let start = Instant::now();

    let held = acquirer(&store, &config("app1")).acquire(&key).await.unwrap();

    assert_eq!(start.elapsed(), Duration::ZERO);
    assert_eq!(held.key, key);
    assert_eq!(held.record.owner, OwnerId::new("app1"));
    assert_eq!(held.record.lease_duration, Duration::from_millis(200));
    assert_eq!(held.record.version, VersionToken::new("v-1"));
    assert_eq!(
        store.calls(),
        vec![
            StoreCall::Read { key: key.clone() },
            StoreCall::Write {
                key: key.clone(),
                record: held.record.clone(),
                expected: Expectation::Absent,
                succeeded: true,
            },
        ]
    );
    assert_eq!(store.record(&key), Some(held.record));
}

#[tokio::test(start_paused = true)]
async fn released_record_is_taken_without_waiting() {
    let store = FakeLeaseStore::new();
    let key = LockKey::new("orders");
    store.put(
        &key,
        LeaseRecord::released(OwnerId::new("app0"), VersionToken::new("old")),
    );
    let start = Instant::now();

    let held = acquirer(&store, &config("app1")).acquire(&key).await.unwrap();

    assert_eq!(start.elapsed(), Duration::ZERO);
    assert_eq!(held.record.owner, OwnerId::new("app1"));
    let writes: Vec<_> = store
        .calls()
        .into_iter()
        .filter_map(|c| match c {
            StoreCall::Write { expected, .. } => Some(expected),
            _ => None,
        })
        .collect();
    assert_eq!(writes, vec![Expectation::Version(VersionToken::new("old"))]);
}

#[tokio::test(start_paused = true)]
async fn crashed_holder_is_replaced_after_its_lease_elapses() {
    let store = FakeLeaseStore::new();
    let key = LockKey::new("orders");
    store.put(
        &key,
        LeaseRecord::leased(
            OwnerId::new("crashed"),
            Duration::from_millis(200),
            VersionToken::new("stale"),
        ),
    );
    let start = Instant::now();

    let held = acquirer(&store, &config("app1")).acquire(&key).await.unwrap();

    assert!(start.elapsed() >= Duration::from_millis(200));
    assert_eq!(held.record.owner, OwnerId::new("app1"));
    match store.calls().last() {
        Some(StoreCall::Write {
            expected,
            succeeded,
            ..
        }) => {
            assert_eq!(*expected, Expectation::Version(VersionToken::new("stale")));
            assert!(*succeeded);
        }
        other => panic!("expected a write, got {:?}", other),
    }
}

#[tokio::test(start_paused = true)]
async fn waits_for_the_holders_duration_not_our_own() {
    let store = FakeLeaseStore::new();
    let key = LockKey::new("orders");
    store.put(
        &key,
        LeaseRecord::leased(
            OwnerId::new("crashed"),
            Duration::from_secs(2),
            VersionToken::new("stale"),
        ),
    );
    let start = Instant::now();

    acquirer(&store, &config("app1")).acquire(&key).await.unwrap();

    assert_eq!(start.elapsed(), Duration::from_secs(2));
}

#[tokio::test(start_paused = true)]
async fn conflicts_exhaust_the_attempt_budget() {
    let store = FakeLeaseStore::new();
    store.set_write_fault(WriteFault::AlwaysConflict);
    let config = config("app1").with_max_acquisition_attempts(2);

    let err = acquirer(&store, &config)
        .acquire(&LockKey::new("orders"))
        .await
        .unwrap_err();

    assert!(err.is_exhausted());
    assert!(err.to_string().contains("exhausted allowed attempts"));
    assert!(matches!(err, AcquireError::Exhausted { attempts: 2, .. }));
    assert_eq!(store.write_attempts(), 2);
}

#[tokio::test(start_paused = true)]
async fn store_fault_aborts_without_retrying() {
    let store = FakeLeaseStore::new();
    store.set_write_fault(WriteFault::Unavailable);

    let err = acquirer(&store, &config("app1"))
        .acquire(&LockKey::new("orders"))
        .await
        .unwrap_err();

    assert!(matches!(err, AcquireError::Store(StoreError::Unavailable(_))));
    assert_eq!(store.write_attempts(), 1);
}

#[tokio::test(start_paused = true)]
async fn read_fault_aborts_before_any_write() {
    let store = FakeLeaseStore::new();
    store.fail_reads(true);

    let err = acquirer(&store, &config("app1"))
        .acquire(&LockKey::new("orders"))
        .await
        .unwrap_err();

    assert!(!err.is_exhausted());
    assert_eq!(store.write_attempts(), 0);
}

#[tokio::test(start_paused = true)]
async fn live_holder_keeps_contender_out() {
    let store = FakeLeaseStore::new();
    let key = LockKey::new("orders");
    let holder_config = config("holder");
    let versions = SequentialVersionGen::new("h");

    let held = Acquirer::new(store.clone(), versions.clone(), &holder_config)
        .acquire(&key)
        .await
        .unwrap();
    let heartbeat =
        Maintainer::new(store.clone(), versions, key.clone(), &holder_config).spawn(&held.record);

    let err = acquirer(&store, &config("contender"))
        .acquire(&key)
        .await
        .unwrap_err();

    assert!(err.is_exhausted());
    let outcome = heartbeat.stop().await;
    assert!(!outcome.is_lost());
    assert!(outcome.renewals >= 8, "renewals: {}", outcome.renewals);
    assert_eq!(
        store.record(&key).map(|r| r.owner),
        Some(OwnerId::new("holder"))
    );
}

#[tokio::test(start_paused = true)]
async fn sort_key_is_passed_through_to_the_store() {
    let store = FakeLeaseStore::new();
    let key = LockKey::new("orders").with_sort(7i64);

    let held = acquirer(&store, &config("app1")).acquire(&key).await.unwrap();

    assert_eq!(held.key, key);
    for call in store.calls() {
        match call {
            StoreCall::Read { key: k } | StoreCall::Write { key: k, .. } => assert_eq!(k, key),
        }
    }
}

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use ts_adapters::FakeAssetStore;
use ts_core::{AccessCode, Catalog, SyncConfig, SystemClock};
use ts_storage::MemoryBackend;

type Store = TeamRecordStore<MemoryBackend, FakeAssetStore, SystemClock>;

const TEAM: TeamId = TeamId::new(42);

fn store() -> Store {
    let config = SyncConfig {
        lock_retry_interval: Duration::from_millis(1),
        ..SyncConfig::default()
    };
    TeamRecordStore::new(
        MemoryBackend::new(),
        FakeAssetStore::new(),
        Arc::new(Catalog::standard().unwrap()),
        config,
    )
}

fn policy() -> WaitPolicy {
    WaitPolicy::default()
        .with_poll_interval(Duration::from_millis(100))
        .with_deadline(None)
}

fn two_members(record: &TeamRecord) -> bool {
    record.participants.len() >= 2
}

async fn join(store: &Store, user: u32) {
    store
        .ensure_participant(TEAM, &AccessCode::new(TEAM, user))
        .await
        .unwrap();
}

#[tokio::test]
async fn verify_checks_once() {
    let store = store();
    let waiter = ConditionWaiter::with_policy(store.clone(), policy());

    assert!(!waiter.verify(TEAM, two_members).await.unwrap());
    join(&store, 1).await;
    join(&store, 2).await;
    assert!(waiter.verify(TEAM, two_members).await.unwrap());
}

#[tokio::test(start_paused = true)]
async fn already_satisfied_resolves_immediately() {
    let store = store();
    join(&store, 1).await;
    join(&store, 2).await;
    let waiter = ConditionWaiter::with_policy(store, policy());

    let record = waiter.watch(TEAM, two_members).join().await.unwrap();
    assert_eq!(record.participants.len(), 2);
}

#[tokio::test(start_paused = true)]
async fn callback_runs_once_condition_becomes_true() {
    let store = store();
    join(&store, 1).await;
    let waiter = ConditionWaiter::with_policy(store.clone(), policy());
    let fired = Arc::new(AtomicBool::new(false));

    let handle = {
        let fired = Arc::clone(&fired);
        waiter.wait_until(TEAM, two_members, move |record| {
            fired.store(true, Ordering::SeqCst);
            record.participants.len()
        })
    };

    tokio::time::sleep(Duration::from_millis(350)).await;
    assert!(!fired.load(Ordering::SeqCst));

    join(&store, 2).await;
    assert_eq!(handle.join().await.unwrap(), 2);
    assert!(fired.load(Ordering::SeqCst));
}

#[tokio::test(start_paused = true)]
async fn absent_record_is_not_satisfied() {
    let waiter = ConditionWaiter::with_policy(store(), policy().with_max_attempts(Some(3)));

    let err = waiter.watch(TEAM, |_| true).join().await.unwrap_err();
    assert!(matches!(err, WaitError::TimedOut { attempts: 3, .. }));
}

#[tokio::test(start_paused = true)]
async fn deadline_bounds_the_wait() {
    let store = store();
    join(&store, 1).await;
    let waiter = ConditionWaiter::with_policy(
        store,
        policy().with_deadline(Some(Duration::from_secs(1))),
    );

    let err = waiter.watch(TEAM, two_members).join().await.unwrap_err();
    match err {
        WaitError::TimedOut { attempts, elapsed } => {
            assert!(elapsed >= Duration::from_secs(1));
            assert!(attempts >= 10);
        }
        other => panic!("expected TimedOut, got {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn cancel_stops_the_wait() {
    let store = store();
    join(&store, 1).await;
    let waiter = ConditionWaiter::with_policy(store, policy());

    let mut handle = waiter.watch(TEAM, two_members);
    tokio::time::sleep(Duration::from_millis(250)).await;
    handle.cancel();

    assert!(matches!(handle.join().await, Err(WaitError::Cancelled)));
}

#[tokio::test(start_paused = true)]
async fn dropped_handle_keeps_waiting() {
    let store = store();
    join(&store, 1).await;
    let waiter = ConditionWaiter::with_policy(store.clone(), policy());
    let (tx, rx) = tokio::sync::oneshot::channel();

    drop(waiter.wait_until(TEAM, two_members, move |_| {
        let _ = tx.send(());
    }));

    tokio::time::sleep(Duration::from_millis(250)).await;
    join(&store, 2).await;
    assert!(rx.await.is_ok());
}

#[test]
fn default_policy_polls_every_second() {
    let waiter = ConditionWaiter::new(store());
    assert_eq!(waiter.policy().poll_interval, Duration::from_millis(1000));
    assert_eq!(waiter.policy().deadline, Some(Duration::from_secs(600)));
}

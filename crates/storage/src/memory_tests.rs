// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::wal::WalError;
use ts_core::FakeClock;

fn fields(screen: &str) -> Fields {
    let mut fields = Fields::new();
    fields.insert("CurrentScreen".to_string(), screen.to_string());
    fields
}

fn holder(id: &str) -> HolderId {
    HolderId::new(id)
}

const TTL: Duration = Duration::from_secs(5);

#[tokio::test]
async fn save_load_remove() {
    let backend = MemoryBackend::new();

    assert_eq!(backend.load("team:1").await.unwrap(), None);
    backend.save("team:1", fields("1")).await.unwrap();
    assert_eq!(backend.load("team:1").await.unwrap(), Some(fields("1")));
    assert_eq!(backend.keys().await.unwrap(), vec!["team:1".to_string()]);

    assert!(backend.remove("team:1").await.unwrap());
    assert!(!backend.remove("team:1").await.unwrap());
    assert_eq!(backend.load("team:1").await.unwrap(), None);
}

#[tokio::test]
async fn lease_is_exclusive_until_released() {
    let backend = MemoryBackend::new();

    assert!(backend.try_lease("team:1", &holder("a"), TTL).await.unwrap());
    assert!(!backend.try_lease("team:1", &holder("b"), TTL).await.unwrap());
    assert_eq!(backend.lease_holder("team:1"), Some(holder("a")));

    // Only the holder can release
    assert!(!backend.release_lease("team:1", &holder("b")).await.unwrap());
    assert!(backend.release_lease("team:1", &holder("a")).await.unwrap());
    assert_eq!(backend.lease_holder("team:1"), None);

    assert!(backend.try_lease("team:1", &holder("b"), TTL).await.unwrap());
}

#[tokio::test]
async fn leases_on_different_keys_are_independent() {
    let backend = MemoryBackend::new();

    assert!(backend.try_lease("team:1", &holder("a"), TTL).await.unwrap());
    assert!(backend.try_lease("team:2", &holder("b"), TTL).await.unwrap());
}

#[tokio::test]
async fn expired_lease_can_be_reclaimed() {
    let clock = FakeClock::new();
    let backend = MemoryBackend::with_clock(clock.clone());

    assert!(backend.try_lease("team:1", &holder("crashed"), TTL).await.unwrap());
    clock.advance(Duration::from_secs(4));
    assert!(!backend.try_lease("team:1", &holder("b"), TTL).await.unwrap());

    clock.advance(Duration::from_secs(2));
    assert!(backend.try_lease("team:1", &holder("b"), TTL).await.unwrap());

    // The crashed holder's late release does not free the new grant
    assert!(!backend.release_lease("team:1", &holder("crashed")).await.unwrap());
    assert_eq!(backend.lease_holder("team:1"), Some(holder("b")));
}

#[tokio::test]
async fn leasing_any_key_sweeps_expired_leases() {
    let clock = FakeClock::new();
    let backend = MemoryBackend::with_clock(clock.clone());

    backend.try_lease("team:1", &holder("a"), TTL).await.unwrap();
    clock.advance(Duration::from_secs(3));
    backend.try_lease("team:2", &holder("b"), TTL).await.unwrap();
    clock.advance(Duration::from_secs(3));

    backend.try_lease("team:3", &holder("c"), TTL).await.unwrap();
    assert_eq!(backend.lease_holder("team:1"), None);
    assert_eq!(backend.lease_holder("team:2"), Some(holder("b")));
}

#[tokio::test]
async fn refresh_extends_only_a_live_lease() {
    let clock = FakeClock::new();
    let backend = MemoryBackend::with_clock(clock.clone());

    assert!(!backend.refresh_lease("team:1", &holder("a")).await.unwrap());

    backend.try_lease("team:1", &holder("a"), TTL).await.unwrap();
    clock.advance(Duration::from_secs(4));
    assert!(backend.refresh_lease("team:1", &holder("a")).await.unwrap());
    assert!(!backend.refresh_lease("team:1", &holder("b")).await.unwrap());

    // Still held four seconds past the original expiry
    clock.advance(Duration::from_secs(4));
    assert!(!backend.try_lease("team:1", &holder("b"), TTL).await.unwrap());

    clock.advance(Duration::from_secs(2));
    assert!(!backend.refresh_lease("team:1", &holder("a")).await.unwrap());
    assert!(backend.try_lease("team:1", &holder("b"), TTL).await.unwrap());
}

#[tokio::test]
async fn durable_log_is_exclusive_to_one_backend() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("records.wal");

    let first = MemoryBackend::open_durable(&path, SystemClock).unwrap();
    let err = MemoryBackend::open_durable(&path, SystemClock).err().unwrap();
    assert!(matches!(err, StoreError::Wal(WalError::Locked { .. })));

    // Clones share the lock
    let clone = first.clone();
    drop(first);
    assert!(MemoryBackend::open_durable(&path, SystemClock).is_err());

    drop(clone);
    assert!(MemoryBackend::open_durable(&path, SystemClock).is_ok());
}

#[tokio::test]
async fn durable_backend_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("records.wal");

    {
        let backend = MemoryBackend::open_durable(&path, SystemClock).unwrap();
        backend.save("team:1", fields("1")).await.unwrap();
        backend.save("team:2", fields("4")).await.unwrap();
        backend.save("team:1", fields("2")).await.unwrap();
        backend.remove("team:2").await.unwrap();
        backend
            .try_lease("team:1", &holder("a"), TTL)
            .await
            .unwrap();
    }

    let backend = MemoryBackend::open_durable(&path, SystemClock).unwrap();
    assert_eq!(backend.load("team:1").await.unwrap(), Some(fields("2")));
    assert_eq!(backend.load("team:2").await.unwrap(), None);
    // Leases are not persisted
    assert_eq!(backend.lease_holder("team:1"), None);
}

#[tokio::test]
async fn removing_missing_record_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("records.wal");

    let backend = MemoryBackend::open_durable(&path, SystemClock).unwrap();
    backend.remove("team:9").await.unwrap();

    assert!(Wal::replay(&path).unwrap().is_empty());
}

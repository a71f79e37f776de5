// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::clock::FakeClock;

fn test_lease() -> Lease {
    Lease::new("team:42", LeaseConfig::new(Duration::from_secs(5)))
}

fn acquire(lease: &Lease, holder: &HolderId, clock: &FakeClock) -> (Lease, Vec<Event>) {
    lease.transition(
        LeaseInput::Acquire {
            holder: holder.clone(),
        },
        clock,
    )
}

#[test]
fn new_lease_is_free() {
    let lease = test_lease();
    assert!(lease.is_free());
    assert!(lease.holder().is_none());
}

#[test]
fn acquire_free_lease_succeeds() {
    let clock = FakeClock::new();
    let holder = HolderId::new("holder-1");

    let (lease, events) = acquire(&test_lease(), &holder, &clock);

    assert!(lease.is_held_by(&holder));
    assert_eq!(
        events,
        vec![Event::LeaseAcquired {
            key: "team:42".to_string(),
            holder: "holder-1".to_string(),
        }]
    );
}

#[test]
fn acquire_held_lease_is_denied() {
    let clock = FakeClock::new();
    let holder1 = HolderId::new("holder-1");
    let holder2 = HolderId::new("holder-2");

    let (lease, _) = acquire(&test_lease(), &holder1, &clock);
    let (lease, events) = acquire(&lease, &holder2, &clock);

    assert!(lease.is_held_by(&holder1));
    assert!(matches!(
        &events[..],
        [Event::LeaseDenied { holder, current_holder, .. }]
        if holder == "holder-2" && current_holder == "holder-1"
    ));
}

#[test]
fn release_frees_lease() {
    let clock = FakeClock::new();
    let holder = HolderId::new("holder-1");

    let (lease, _) = acquire(&test_lease(), &holder, &clock);
    let (lease, events) = lease.transition(LeaseInput::Release { holder }, &clock);

    assert!(lease.is_free());
    assert!(matches!(&events[..], [Event::LeaseReleased { .. }]));
}

#[test]
fn release_by_wrong_holder_is_noop() {
    let clock = FakeClock::new();
    let holder1 = HolderId::new("holder-1");

    let (lease, _) = acquire(&test_lease(), &holder1, &clock);
    let (lease, events) = lease.transition(
        LeaseInput::Release {
            holder: HolderId::new("holder-2"),
        },
        &clock,
    );

    assert!(lease.is_held_by(&holder1));
    assert!(events.is_empty());
}

#[test]
fn expired_lease_can_be_reclaimed() {
    let clock = FakeClock::new();
    let holder1 = HolderId::new("holder-1");
    let holder2 = HolderId::new("holder-2");

    let (lease, _) = acquire(&test_lease(), &holder1, &clock);
    clock.advance(Duration::from_secs(5));
    assert!(lease.is_expired(&clock));

    let (lease, events) = acquire(&lease, &holder2, &clock);

    assert!(lease.is_held_by(&holder2));
    assert_eq!(events.len(), 2);
    assert!(matches!(
        &events[0],
        Event::LeaseReclaimed { previous_holder, new_holder, .. }
        if previous_holder == "holder-1" && new_holder == "holder-2"
    ));
}

#[test]
fn late_release_after_reclaim_keeps_new_holder() {
    let clock = FakeClock::new();
    let holder1 = HolderId::new("holder-1");
    let holder2 = HolderId::new("holder-2");

    let (lease, _) = acquire(&test_lease(), &holder1, &clock);
    clock.advance(Duration::from_secs(6));
    let (lease, _) = acquire(&lease, &holder2, &clock);
    let (lease, events) = lease.transition(LeaseInput::Release { holder: holder1 }, &clock);

    assert!(lease.is_held_by(&holder2));
    assert!(events.is_empty());
}

#[test]
fn refresh_extends_grant() {
    let clock = FakeClock::new();
    let holder = HolderId::new("holder-1");

    let (lease, _) = acquire(&test_lease(), &holder, &clock);
    clock.advance(Duration::from_secs(4));
    let (lease, _) = lease.transition(LeaseInput::Refresh { holder }, &clock);
    clock.advance(Duration::from_secs(4));

    assert!(!lease.is_expired(&clock));
}

#[test]
fn tick_frees_expired_lease() {
    let clock = FakeClock::new();
    let holder = HolderId::new("holder-1");

    let (lease, _) = acquire(&test_lease(), &holder, &clock);
    let (lease, events) = lease.transition(LeaseInput::Tick, &clock);
    assert!(!lease.is_free());
    assert!(events.is_empty());

    clock.advance(Duration::from_secs(10));
    let (lease, events) = lease.transition(LeaseInput::Tick, &clock);

    assert!(lease.is_free());
    assert!(matches!(
        &events[..],
        [Event::LeaseExpired { holder, .. }] if holder == "holder-1"
    ));
}

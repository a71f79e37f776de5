// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::sync::Arc;
use std::time::Duration;
use ts_adapters::FakeAssetStore;
use ts_core::{Catalog, SyncConfig, SystemClock};
use ts_storage::MemoryBackend;
use yare::parameterized;

type Store = TeamRecordStore<MemoryBackend, FakeAssetStore, SystemClock>;

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

fn code(user: u32) -> AccessCode {
    AccessCode::new(TEAM, user)
}

const TEAM: TeamId = TeamId::new(42);

async fn team_of(store: &Store, users: &[u32]) {
    for user in users {
        store.ensure_participant(TEAM, &code(*user)).await.unwrap();
    }
}

#[tokio::test]
async fn pending_until_everyone_is_ready_then_granted() {
    let store = store();
    team_of(&store, &[1, 2]).await;
    store.set_current_screen(TEAM, 4).await.unwrap();
    let barrier = ReadinessBarrier::new(store.clone());

    barrier.add_ready(TEAM, &code(1)).await.unwrap();
    assert_eq!(barrier.check_all_ready(TEAM).await.unwrap(), BarrierOutcome::Pending);
    let record = store.get(TEAM).await.unwrap().unwrap();
    assert_eq!(record.ready_to_start.len(), 1);
    assert_eq!(record.current_screen, 4);

    barrier.add_ready(TEAM, &code(2)).await.unwrap();
    assert_eq!(barrier.check_all_ready(TEAM).await.unwrap(), BarrierOutcome::Granted);

    let record = store.get(TEAM).await.unwrap().unwrap();
    assert!(record.ready_to_start.is_empty());
    assert_eq!(record.current_screen, INSTRUCTION_SCREEN);
    assert_eq!(record.participants.len(), 2);
}

#[tokio::test]
async fn single_participant_never_reaches_quorum() {
    let store = store();
    team_of(&store, &[1]).await;
    let barrier = ReadinessBarrier::new(store.clone());

    assert_eq!(
        barrier.signal_ready(TEAM, &code(1)).await.unwrap(),
        BarrierOutcome::Pending
    );
    let record = store.get(TEAM).await.unwrap().unwrap();
    assert!(record.ready_to_start.contains(&code(1)));
}

#[tokio::test]
async fn readiness_from_unknown_member_joins_them() {
    let store = store();
    team_of(&store, &[1]).await;
    let barrier = ReadinessBarrier::new(store.clone());

    barrier.signal_ready(TEAM, &code(1)).await.unwrap();
    assert_eq!(
        barrier.signal_ready(TEAM, &code(2)).await.unwrap(),
        BarrierOutcome::Granted
    );
    assert_eq!(store.participants(TEAM).await.unwrap().len(), 2);
}

#[tokio::test]
async fn absent_team_is_pending() {
    let barrier = ReadinessBarrier::new(store());

    assert_eq!(barrier.check_all_ready(TEAM).await.unwrap(), BarrierOutcome::Pending);
    assert_eq!(
        barrier.signal_ready(TEAM, &code(1)).await.unwrap(),
        BarrierOutcome::Pending
    );
    assert!(!barrier.add_ready(TEAM, &code(1)).await.unwrap());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_signals_grant_exactly_once() {
    let store = store();
    team_of(&store, &[1, 2, 3]).await;
    let barrier = ReadinessBarrier::new(store.clone());

    let tasks: Vec<_> = [1, 2, 3]
        .into_iter()
        .map(|user| {
            let barrier = barrier.clone();
            tokio::spawn(async move { barrier.signal_ready(TEAM, &code(user)).await })
        })
        .collect();

    let mut granted = 0;
    for task in tasks {
        if task.await.unwrap().unwrap() == BarrierOutcome::Granted {
            granted += 1;
        }
    }
    assert_eq!(granted, 1);
    assert!(store.get(TEAM).await.unwrap().unwrap().ready_to_start.is_empty());
}

#[parameterized(
    late_joiner = { true, TestId::IdeaGen, Operation::StartTest, 1 },
    practice_next_screen = { false, TestId::PracArea, Operation::NextScreen, 2 },
    practice_edit_title = { false, TestId::PracArea, Operation::EditTitle, 3 },
)]
#[test_macro(tokio::test)]
async fn enter_bypasses_quorum(late: bool, test: TestId, operation: Operation, screen: u32) {
    let store = store();
    team_of(&store, &[1, 2]).await;
    store.set_current_screen(TEAM, screen).await.unwrap();
    let barrier = ReadinessBarrier::new(store.clone());

    let request = GateRequest {
        late,
        test,
        operation,
    };
    assert_eq!(
        barrier.enter(TEAM, &code(1), request).await.unwrap(),
        BarrierOutcome::Bypassed
    );
    assert!(store.get(TEAM).await.unwrap().unwrap().ready_to_start.is_empty());
}

#[parameterized(
    practice_start = { TestId::PracArea, Operation::StartTest, 2 },
    practice_instructions = { TestId::PracArea, Operation::NextScreen, 1 },
    other_test = { TestId::ParLines, Operation::NextScreen, 5 },
)]
#[test_macro(tokio::test)]
async fn enter_waits_for_quorum(test: TestId, operation: Operation, screen: u32) {
    let store = store();
    team_of(&store, &[1, 2]).await;
    store.set_current_screen(TEAM, screen).await.unwrap();
    let barrier = ReadinessBarrier::new(store.clone());
    let request = GateRequest {
        late: false,
        test,
        operation,
    };

    assert_eq!(
        barrier.enter(TEAM, &code(1), request).await.unwrap(),
        BarrierOutcome::Pending
    );
    assert_eq!(
        barrier.enter(TEAM, &code(2), request).await.unwrap(),
        BarrierOutcome::Granted
    );
}

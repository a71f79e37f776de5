// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Polling condition waits over a team's record
//!
//! A wait re-reads the record every poll interval until a predicate holds.
//! Each wait runs in its own task and is bounded by the policy's deadline
//! and attempt limit. Dropping a [`WaitHandle`] detaches the wait; use
//! [`WaitHandle::cancel`] to stop it.

use crate::error::WaitError;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use ts_adapters::AssetStore;
use ts_core::{Clock, TeamId, TeamRecord, WaitPolicy};
use ts_storage::{RecordBackend, StoreError, TeamRecordStore};

/// Handle to a running wait
pub struct WaitHandle<T> {
    cancel: Option<oneshot::Sender<()>>,
    task: JoinHandle<Result<T, WaitError>>,
}

impl<T> WaitHandle<T> {
    /// Stop waiting; the wait resolves to [`WaitError::Cancelled`]
    pub fn cancel(&mut self) {
        if let Some(tx) = self.cancel.take() {
            let _ = tx.send(());
        }
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Wait for the outcome
    pub async fn join(self) -> Result<T, WaitError> {
        match self.task.await {
            Ok(result) => result,
            Err(e) => {
                tracing::error!(error = %e, "wait task failed");
                Err(WaitError::Aborted)
            }
        }
    }
}

/// Evaluates predicates over a team's record until they hold
#[derive(Clone)]
pub struct ConditionWaiter<B, A, C> {
    store: TeamRecordStore<B, A, C>,
    policy: WaitPolicy,
}

impl<B: RecordBackend, A: AssetStore, C: Clock> ConditionWaiter<B, A, C> {
    /// Waiter using the store's configured wait policy
    pub fn new(store: TeamRecordStore<B, A, C>) -> Self {
        let policy = store.config().wait.clone();
        Self::with_policy(store, policy)
    }

    pub fn with_policy(store: TeamRecordStore<B, A, C>, policy: WaitPolicy) -> Self {
        Self { store, policy }
    }

    pub fn policy(&self) -> &WaitPolicy {
        &self.policy
    }

    /// Check the predicate once; an absent record does not satisfy it
    pub async fn verify<P>(&self, team: TeamId, predicate: P) -> Result<bool, StoreError>
    where
        P: Fn(&TeamRecord) -> bool,
    {
        Ok(self
            .store
            .get(team)
            .await?
            .is_some_and(|record| predicate(&record)))
    }

    /// Resolve to the first record snapshot satisfying `predicate`
    pub fn watch<P>(&self, team: TeamId, predicate: P) -> WaitHandle<TeamRecord>
    where
        P: Fn(&TeamRecord) -> bool + Send + Sync + 'static,
    {
        self.wait_until(team, predicate, |record| record)
    }

    /// Call `on_satisfied` with the record once `predicate` holds
    pub fn wait_until<P, F, T>(&self, team: TeamId, predicate: P, on_satisfied: F) -> WaitHandle<T>
    where
        P: Fn(&TeamRecord) -> bool + Send + Sync + 'static,
        F: FnOnce(TeamRecord) -> T + Send + 'static,
        T: Send + 'static,
    {
        let (cancel_tx, cancel_rx) = oneshot::channel();
        let store = self.store.clone();
        let policy = self.policy.clone();

        let task = tokio::spawn(async move {
            let record = poll(&store, &policy, team, predicate, cancel_rx).await?;
            Ok(on_satisfied(record))
        });

        WaitHandle {
            cancel: Some(cancel_tx),
            task,
        }
    }
}

async fn poll<B, A, C, P>(
    store: &TeamRecordStore<B, A, C>,
    policy: &WaitPolicy,
    team: TeamId,
    predicate: P,
    mut cancel: oneshot::Receiver<()>,
) -> Result<TeamRecord, WaitError>
where
    B: RecordBackend,
    A: AssetStore,
    C: Clock,
    P: Fn(&TeamRecord) -> bool,
{
    let started = Instant::now();
    let mut attempts: u32 = 0;
    // Cleared once the handle is dropped without cancelling
    let mut listening = true;

    loop {
        attempts += 1;
        if let Some(record) = store.get(team).await? {
            if predicate(&record) {
                tracing::debug!(%team, attempts, "condition satisfied");
                return Ok(record);
            }
        }

        let elapsed = started.elapsed();
        let out_of_attempts = policy.max_attempts.is_some_and(|max| attempts >= max);
        let past_deadline = policy.deadline.is_some_and(|deadline| elapsed >= deadline);
        if out_of_attempts || past_deadline {
            tracing::warn!(%team, attempts, ?elapsed, "gave up waiting for condition");
            return Err(WaitError::TimedOut { attempts, elapsed });
        }

        tokio::select! {
            _ = tokio::time::sleep(policy.poll_interval) => {}
            signal = &mut cancel, if listening => match signal {
                Ok(()) => {
                    tracing::debug!(%team, attempts, "wait cancelled");
                    return Err(WaitError::Cancelled);
                }
                Err(_) => listening = false,
            },
        }
    }
}

#[cfg(test)]
#[path = "waiter_tests.rs"]
mod tests;

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Readiness barrier
//!
//! A gate opens once every current participant has signalled readiness and
//! at least two are present. Opening the gate clears readiness and rewinds
//! the team to the instruction screen in the same locked update.

use ts_adapters::AssetStore;
use ts_core::{
    AccessCode, Clock, Event, Operation, TeamId, TeamRecord, TestId, INSTRUCTION_SCREEN,
};
use ts_storage::{RecordBackend, StoreError, TeamRecordStore};

/// Result of a readiness check
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BarrierOutcome {
    /// The quorum was reached; readiness has been cleared
    Granted,
    /// The participant was let through without waiting for the quorum
    Bypassed,
    /// Still waiting for someone
    Pending,
}

impl BarrierOutcome {
    pub fn is_granted(&self) -> bool {
        !matches!(self, BarrierOutcome::Pending)
    }
}

/// Context of a participant asking to pass a gate
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GateRequest {
    /// Participant joined after the team started
    pub late: bool,
    pub test: TestId,
    pub operation: Operation,
}

impl GateRequest {
    /// Late joiners, and practice-area moves past the instructions other
    /// than starting the test, skip the quorum
    fn bypasses(&self, current_screen: u32) -> bool {
        self.late
            || (self.test == TestId::PracArea
                && current_screen > INSTRUCTION_SCREEN
                && self.operation != Operation::StartTest)
    }
}

fn open_if_all_ready(team: TeamId, record: &mut TeamRecord) -> BarrierOutcome {
    if !record.all_ready() {
        return BarrierOutcome::Pending;
    }
    let participants = record.ready_to_start.len();
    record.ready_to_start.clear();
    record.current_screen = INSTRUCTION_SCREEN;
    Event::BarrierGranted {
        team: team.get(),
        participants,
    }
    .log();
    BarrierOutcome::Granted
}

/// Quorum gate over a team's Participants and ReadyToStart sets
#[derive(Clone)]
pub struct ReadinessBarrier<B, A, C> {
    store: TeamRecordStore<B, A, C>,
}

impl<B: RecordBackend, A: AssetStore, C: Clock> ReadinessBarrier<B, A, C> {
    pub fn new(store: TeamRecordStore<B, A, C>) -> Self {
        Self { store }
    }

    /// Mark `code` ready, adding it to Participants if missing
    pub async fn add_ready(&self, team: TeamId, code: &AccessCode) -> Result<bool, StoreError> {
        self.store.add_ready(team, code).await
    }

    /// Open the gate if everybody is ready; a pending check changes nothing
    pub async fn check_all_ready(&self, team: TeamId) -> Result<BarrierOutcome, StoreError> {
        Ok(self
            .store
            .update_with(team, |record| open_if_all_ready(team, record))
            .await?
            .unwrap_or(BarrierOutcome::Pending))
    }

    /// Mark ready and check the quorum in one locked update
    pub async fn signal_ready(
        &self,
        team: TeamId,
        code: &AccessCode,
    ) -> Result<BarrierOutcome, StoreError> {
        let code = code.clone();
        Ok(self
            .store
            .update_with(team, move |record| {
                record.mark_ready(code);
                open_if_all_ready(team, record)
            })
            .await?
            .unwrap_or(BarrierOutcome::Pending))
    }

    /// Ask to pass the gate
    ///
    /// Bypassing participants are let through without touching
    /// ReadyToStart; everybody else signals readiness.
    pub async fn enter(
        &self,
        team: TeamId,
        code: &AccessCode,
        request: GateRequest,
    ) -> Result<BarrierOutcome, StoreError> {
        let screen = self.store.current_screen(team).await?;
        if request.bypasses(screen) {
            tracing::debug!(%team, %code, ?request, screen, "gate bypassed");
            return Ok(BarrierOutcome::Bypassed);
        }
        self.signal_ready(team, code).await
    }
}

#[cfg(test)]
#[path = "barrier_tests.rs"]
mod tests;

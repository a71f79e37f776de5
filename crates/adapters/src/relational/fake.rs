// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake relational store for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{RelationalError, RelationalStore, TransactionRow};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use ts_core::{TeamId, TestId};

/// Recorded mutating call
#[derive(Debug, Clone, PartialEq)]
pub enum RelationalCall {
    SaveTransaction {
        team: TeamId,
        user_id: u32,
        test: TestId,
        data: Value,
    },
    DeactivateUser {
        team: TeamId,
        user_id: u32,
    },
    ActiveUsersCount,
}

#[derive(Default)]
struct FakeState {
    time_limits: HashMap<TestId, Duration>,
    rows: Vec<TransactionRow>,
    inactive: HashSet<(TeamId, u32)>,
    introduction: Option<PathBuf>,
    instructions: HashMap<TestId, PathBuf>,
    calls: Vec<RelationalCall>,
}

/// In-memory relational store
#[derive(Clone, Default)]
pub struct FakeRelationalStore {
    inner: Arc<Mutex<FakeState>>,
}

impl FakeRelationalStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> std::sync::MutexGuard<'_, FakeState> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn set_time_limit(&self, test: TestId, limit: Duration) {
        self.state().time_limits.insert(test, limit);
    }

    pub fn set_introduction_file(&self, path: impl Into<PathBuf>) {
        self.state().introduction = Some(path.into());
    }

    pub fn set_instruction_file(&self, test: TestId, path: impl Into<PathBuf>) {
        self.state().instructions.insert(test, path.into());
    }

    /// Seed a row as if saved on the given screen
    pub fn add_row(&self, row: TransactionRow) {
        self.state().rows.push(row);
    }

    pub fn calls(&self) -> Vec<RelationalCall> {
        self.state().calls.clone()
    }

    pub fn is_active(&self, team: TeamId, user_id: u32) -> bool {
        !self.state().inactive.contains(&(team, user_id))
    }
}

#[async_trait]
impl RelationalStore for FakeRelationalStore {
    async fn test_time_limit(&self, test: TestId) -> Result<Duration, RelationalError> {
        self.state()
            .time_limits
            .get(&test)
            .copied()
            .ok_or_else(|| RelationalError::QueryFailed(format!("no time limit for {}", test)))
    }

    async fn save_transaction(
        &self,
        team: TeamId,
        user_id: u32,
        test: TestId,
        data: Value,
    ) -> Result<(), RelationalError> {
        self.state().calls.push(RelationalCall::SaveTransaction {
            team,
            user_id,
            test,
            data,
        });
        Ok(())
    }

    async fn transactions(
        &self,
        team: TeamId,
        test: TestId,
        screen: u32,
    ) -> Result<Vec<TransactionRow>, RelationalError> {
        Ok(self
            .state()
            .rows
            .iter()
            .filter(|r| r.team_id == team && r.test_id == test && r.screen == screen)
            .cloned()
            .collect())
    }

    async fn active_users_count(&self) -> Result<u64, RelationalError> {
        self.state().calls.push(RelationalCall::ActiveUsersCount);
        Ok(0)
    }

    async fn deactivate_user(&self, team: TeamId, user_id: u32) -> Result<(), RelationalError> {
        let mut state = self.state();
        state.inactive.insert((team, user_id));
        state
            .calls
            .push(RelationalCall::DeactivateUser { team, user_id });
        Ok(())
    }

    async fn introduction_file(&self) -> Result<PathBuf, RelationalError> {
        self.state()
            .introduction
            .clone()
            .ok_or_else(|| RelationalError::FileNotRegistered("introduction".to_string()))
    }

    async fn test_instruction_file(&self, test: TestId) -> Result<PathBuf, RelationalError> {
        self.state()
            .instructions
            .get(&test)
            .cloned()
            .ok_or_else(|| RelationalError::FileNotRegistered(test.to_string()))
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;

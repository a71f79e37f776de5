// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Relational store holding transaction history and static file metadata

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeRelationalStore, RelationalCall};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use ts_core::{TeamId, TestId};

/// Errors from relational store operations
#[derive(Debug, Error)]
pub enum RelationalError {
    #[error("query failed: {0}")]
    QueryFailed(String),
    #[error("no file registered for {0}")]
    FileNotRegistered(String),
}

/// One saved participant action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRow {
    pub team_id: TeamId,
    pub user_id: u32,
    pub test_id: TestId,
    pub screen: u32,
    pub data: Value,
}

/// Adapter for the relational database
#[async_trait]
pub trait RelationalStore: Clone + Send + Sync + 'static {
    /// Time allotted to a test
    async fn test_time_limit(&self, test: TestId) -> Result<Duration, RelationalError>;

    /// Persist one participant action
    async fn save_transaction(
        &self,
        team: TeamId,
        user_id: u32,
        test: TestId,
        data: Value,
    ) -> Result<(), RelationalError>;

    /// Actions recorded for a team on one screen of a test
    async fn transactions(
        &self,
        team: TeamId,
        test: TestId,
        screen: u32,
    ) -> Result<Vec<TransactionRow>, RelationalError>;

    async fn active_users_count(&self) -> Result<u64, RelationalError>;

    async fn deactivate_user(&self, team: TeamId, user_id: u32) -> Result<(), RelationalError>;

    /// Path of the introduction page
    async fn introduction_file(&self) -> Result<PathBuf, RelationalError>;

    /// Path of a test's instruction page
    async fn test_instruction_file(&self, test: TestId) -> Result<PathBuf, RelationalError>;
}

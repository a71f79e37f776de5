// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the engine

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use ts_adapters::{GatewayError, RelationalError};
use ts_core::TestId;
use ts_storage::StoreError;

/// Errors ending a condition wait
#[derive(Debug, Error)]
pub enum WaitError {
    #[error("condition not met after {attempts} checks in {elapsed:?}")]
    TimedOut { attempts: u32, elapsed: Duration },
    #[error("wait cancelled")]
    Cancelled,
    #[error("store error: {0}")]
    Store(#[from] StoreError),
    #[error("wait task aborted")]
    Aborted,
}

/// Errors from participant session operations
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("store error: {0}")]
    Store(#[from] StoreError),
    #[error("gateway error: {0}")]
    Gateway(#[from] GatewayError),
    #[error("relational store error: {0}")]
    Relational(#[from] RelationalError),
    #[error("failed to encode payload: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("no catalog entry for test {0}")]
    UnknownTest(TestId),
    #[error("failed to read {path}: {source}")]
    File {
        path: PathBuf,
        source: std::io::Error,
    },
}

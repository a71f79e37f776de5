// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Record backend abstraction
//!
//! A backend is a hash-map-style store of flat field maps plus an atomic
//! lease primitive used by the [`LockManager`](crate::LockManager).

use crate::wal::WalError;
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;
use ts_core::{Fields, HolderId, RecordError};

/// Errors from record storage
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("backend unavailable: {0}")]
    Unavailable(String),
    #[error("timed out after {waited:?} waiting for lock on {key}")]
    LockTimeout { key: String, waited: Duration },
    #[error("lock on {key} expired before the write")]
    LockLost { key: String },
    #[error("write-ahead log error: {0}")]
    Wal(#[from] WalError),
    #[error("corrupt record {key}: {source}")]
    Record {
        key: String,
        #[source]
        source: RecordError,
    },
}

/// Storage for team records and their leases
#[async_trait]
pub trait RecordBackend: Clone + Send + Sync + 'static {
    /// Fields of a record, or `None` if absent
    async fn load(&self, key: &str) -> Result<Option<Fields>, StoreError>;

    /// Replace all fields of a record
    async fn save(&self, key: &str, fields: Fields) -> Result<(), StoreError>;

    /// Remove a record; returns whether it existed
    async fn remove(&self, key: &str) -> Result<bool, StoreError>;

    /// Keys of all stored records
    async fn keys(&self) -> Result<Vec<String>, StoreError>;

    /// Take the lease on `key` for `holder` if it is free or expired
    async fn try_lease(
        &self,
        key: &str,
        holder: &HolderId,
        ttl: Duration,
    ) -> Result<bool, StoreError>;

    /// Extend the lease `holder` still holds by a full ttl
    ///
    /// Returns false, changing nothing, if the lease expired or passed to
    /// someone else.
    async fn refresh_lease(&self, key: &str, holder: &HolderId) -> Result<bool, StoreError>;

    /// Give the lease back; false if `holder` no longer held it
    async fn release_lease(&self, key: &str, holder: &HolderId) -> Result<bool, StoreError>;
}

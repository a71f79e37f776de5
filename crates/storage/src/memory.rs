// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-process record backend, optionally durable through a WAL

use crate::backend::{RecordBackend, StoreError};
use crate::operation::RecordOp;
use crate::state::MaterializedRecords;
use crate::wal::{OpenedLog, Wal};
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use ts_core::{Clock, Fields, HolderId, Lease, LeaseConfig, LeaseInput, SystemClock};

struct Inner {
    records: MaterializedRecords,
    leases: HashMap<String, Lease>,
    wal: Option<Wal>,
}

/// Backend holding records in memory
///
/// When opened with [`MemoryBackend::open_durable`], every write is appended
/// to a write-ahead log before it is applied, and the log is replayed on
/// open. Leases are never persisted.
#[derive(Clone)]
pub struct MemoryBackend<C: Clock = SystemClock> {
    inner: Arc<Mutex<Inner>>,
    clock: C,
}

impl MemoryBackend<SystemClock> {
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl Default for MemoryBackend<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> MemoryBackend<C> {
    /// Volatile backend using the given clock for lease expiry
    pub fn with_clock(clock: C) -> Self {
        Self::from_parts(MaterializedRecords::default(), None, clock)
    }

    /// Backend persisted to the WAL at `path`, replaying existing entries
    ///
    /// The log stays locked to this backend until its last clone is dropped.
    pub fn open_durable(path: &Path, clock: C) -> Result<Self, StoreError> {
        let OpenedLog {
            wal,
            records,
            compacted,
        } = Wal::open(path)?;
        tracing::info!(
            path = %path.display(),
            sequence = wal.sequence(),
            records = records.len(),
            compacted,
            "opened record log"
        );
        Ok(Self::from_parts(records, Some(wal), clock))
    }

    fn from_parts(records: MaterializedRecords, wal: Option<Wal>, clock: C) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                records,
                leases: HashMap::new(),
                wal,
            })),
            clock,
        }
    }

    fn write(&self, op: RecordOp) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(wal) = inner.wal.as_mut() {
            wal.append(&op)?;
        }
        inner.records.apply(&op);
        Ok(())
    }

    /// Holder of the lease on `key`, ignoring expiry
    #[cfg(test)]
    pub(crate) fn lease_holder(&self, key: &str) -> Option<HolderId> {
        let inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner.leases.get(key).and_then(|l| l.holder().cloned())
    }
}

/// Drop every expired lease; returns how many were dropped
fn sweep_expired(leases: &mut HashMap<String, Lease>, clock: &impl Clock) -> usize {
    let mut expired = 0;
    leases.retain(|_, lease| {
        let (next, events) = lease.transition(LeaseInput::Tick, clock);
        for event in &events {
            event.log();
        }
        if next.is_free() {
            expired += usize::from(!events.is_empty());
            false
        } else {
            true
        }
    });
    expired
}

#[async_trait]
impl<C: Clock> RecordBackend for MemoryBackend<C> {
    async fn load(&self, key: &str) -> Result<Option<Fields>, StoreError> {
        let inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        Ok(inner.records.get(key).cloned())
    }

    async fn save(&self, key: &str, fields: Fields) -> Result<(), StoreError> {
        self.write(RecordOp::Put {
            key: key.to_string(),
            fields,
        })
    }

    async fn remove(&self, key: &str) -> Result<bool, StoreError> {
        let existed = {
            let inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
            inner.records.contains(key)
        };
        if existed {
            self.write(RecordOp::Delete {
                key: key.to_string(),
            })?;
        }
        Ok(existed)
    }

    async fn keys(&self) -> Result<Vec<String>, StoreError> {
        let inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        Ok(inner.records.keys().map(String::from).collect())
    }

    async fn try_lease(
        &self,
        key: &str,
        holder: &HolderId,
        ttl: Duration,
    ) -> Result<bool, StoreError> {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        let expired = sweep_expired(&mut inner.leases, &self.clock);
        if expired > 0 {
            tracing::debug!(expired, "dropped expired leases");
        }
        let mut lease = inner
            .leases
            .remove(key)
            .unwrap_or_else(|| Lease::new(key, LeaseConfig::new(ttl)));
        lease.config.ttl = ttl;

        let (next, events) = lease.transition(
            LeaseInput::Acquire {
                holder: holder.clone(),
            },
            &self.clock,
        );
        for event in &events {
            event.log();
        }
        let acquired = next.is_held_by(holder);
        inner.leases.insert(key.to_string(), next);
        Ok(acquired)
    }

    async fn refresh_lease(&self, key: &str, holder: &HolderId) -> Result<bool, StoreError> {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        let Some(lease) = inner.leases.get_mut(key) else {
            return Ok(false);
        };
        let (next, _) = lease.transition(
            LeaseInput::Refresh {
                holder: holder.clone(),
            },
            &self.clock,
        );
        let refreshed = next.is_held_by(holder) && !next.is_expired(&self.clock);
        *lease = next;
        Ok(refreshed)
    }

    async fn release_lease(&self, key: &str, holder: &HolderId) -> Result<bool, StoreError> {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        let Some(lease) = inner.leases.remove(key) else {
            return Ok(false);
        };

        let (next, events) = lease.transition(
            LeaseInput::Release {
                holder: holder.clone(),
            },
            &self.clock,
        );
        for event in &events {
            event.log();
        }
        let released = !events.is_empty();
        if !next.is_free() {
            inner.leases.insert(key.to_string(), next);
        }
        Ok(released)
    }
}

#[cfg(test)]
#[path = "memory_tests.rs"]
mod tests;

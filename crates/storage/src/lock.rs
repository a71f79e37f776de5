// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-key advisory locks over backend leases

use crate::backend::{RecordBackend, StoreError};
use std::time::Duration;
use ts_core::{HolderId, SyncConfig};

/// Hands out exclusive, TTL-bounded locks on record keys
#[derive(Clone)]
pub struct LockManager<B> {
    backend: B,
    ttl: Duration,
    retry_interval: Duration,
    acquire_timeout: Duration,
}

impl<B: RecordBackend> LockManager<B> {
    pub fn new(backend: B, ttl: Duration, retry_interval: Duration, acquire_timeout: Duration) -> Self {
        Self {
            backend,
            ttl,
            retry_interval,
            acquire_timeout,
        }
    }

    pub fn from_config(backend: B, config: &SyncConfig) -> Self {
        Self::new(
            backend,
            config.lock_ttl,
            config.lock_retry_interval,
            config.lock_acquire_timeout,
        )
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Wait until the lock on `key` is ours
    ///
    /// Polls the backend every retry interval. Fails with
    /// [`StoreError::LockTimeout`] once the acquire timeout has passed, and
    /// with any backend error immediately.
    pub async fn acquire(&self, key: &str) -> Result<LockGuard<B>, StoreError> {
        let holder = HolderId::new(uuid::Uuid::new_v4().to_string());
        let started = tokio::time::Instant::now();
        let mut attempts: u32 = 0;

        loop {
            attempts += 1;
            if self.backend.try_lease(key, &holder, self.ttl).await? {
                if attempts > 1 {
                    tracing::debug!(key, attempts, "lock acquired after contention");
                }
                return Ok(LockGuard {
                    backend: self.backend.clone(),
                    key: key.to_string(),
                    holder,
                    released: false,
                });
            }

            let waited = started.elapsed();
            if waited >= self.acquire_timeout {
                tracing::warn!(key, ?waited, attempts, "lock acquisition timed out");
                return Err(StoreError::LockTimeout {
                    key: key.to_string(),
                    waited,
                });
            }
            tokio::time::sleep(self.retry_interval).await;
        }
    }
}

/// Proof of holding a lock; give it back with [`LockGuard::release`]
///
/// A guard dropped without release frees the lock from a background task
/// when a runtime is available, otherwise the lease runs out on its own.
pub struct LockGuard<B: RecordBackend> {
    backend: B,
    key: String,
    holder: HolderId,
    released: bool,
}

impl<B: RecordBackend> LockGuard<B> {
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn holder(&self) -> &HolderId {
        &self.holder
    }

    /// Extend the lock by a full ttl; false once it has expired
    pub async fn refresh(&self) -> Result<bool, StoreError> {
        self.backend.refresh_lease(&self.key, &self.holder).await
    }

    /// Release the lock; false if it had already been reclaimed by someone else
    pub async fn release(mut self) -> Result<bool, StoreError> {
        self.released = true;
        let released = self.backend.release_lease(&self.key, &self.holder).await?;
        if !released {
            tracing::warn!(key = %self.key, holder = %self.holder, "lock lost before release");
        }
        Ok(released)
    }
}

impl<B: RecordBackend> Drop for LockGuard<B> {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            return;
        };
        let backend = self.backend.clone();
        let key = std::mem::take(&mut self.key);
        let holder = self.holder.clone();
        handle.spawn(async move {
            if let Err(e) = backend.release_lease(&key, &holder).await {
                tracing::warn!(key = %key, error = %e, "failed to release dropped lock");
            }
        });
    }
}

#[cfg(test)]
#[path = "lock_tests.rs"]
mod tests;

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Command handlers

pub mod order;
pub mod team;

use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use ts_adapters::{FsAssetStore, TracedAssetStore};
use ts_core::{Catalog, SyncConfig, SystemClock};
use ts_storage::{MemoryBackend, StoreError, TeamRecordStore, WalError};

/// Record log inside the data directory
const WAL_FILE: &str = "records.wal";

pub type Store = TeamRecordStore<MemoryBackend, TracedAssetStore<FsAssetStore>>;

/// Everything a command needs, opened from the data directory
pub struct Env {
    pub store: Store,
}

impl Env {
    pub async fn open(data_dir: &Path, config: SyncConfig) -> Result<Self> {
        std::fs::create_dir_all(data_dir)
            .with_context(|| format!("creating {}", data_dir.display()))?;
        let backend = open_backend(&data_dir.join(WAL_FILE), &config).await?;

        let image_dir = if config.background_image_dir.is_absolute() {
            config.background_image_dir.clone()
        } else {
            data_dir.join(&config.background_image_dir)
        };
        let assets = TracedAssetStore::new(FsAssetStore::new(image_dir));
        let catalog = Arc::new(Catalog::standard()?);

        Ok(Self {
            store: TeamRecordStore::new(backend, assets, catalog, config),
        })
    }
}

/// Open the record log, waiting while another tsync process owns it
async fn open_backend(path: &Path, config: &SyncConfig) -> Result<MemoryBackend> {
    let start = Instant::now();
    loop {
        match MemoryBackend::open_durable(path, SystemClock) {
            Err(StoreError::Wal(WalError::Locked { .. }))
                if start.elapsed() < config.lock_acquire_timeout =>
            {
                tracing::debug!(path = %path.display(), "record log busy, waiting");
                tokio::time::sleep(config.lock_retry_interval).await;
            }
            result => {
                return result.with_context(|| format!("opening {}", path.display()));
            }
        }
    }
}

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake asset store for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{AssetError, AssetStore};
use async_trait::async_trait;
use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};

/// In-memory set of asset names
#[derive(Clone, Default)]
pub struct FakeAssetStore {
    assets: Arc<Mutex<BTreeSet<String>>>,
    removed: Arc<Mutex<Vec<String>>>,
}

impl FakeAssetStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, name: impl Into<String>) {
        self.assets
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(name.into());
    }

    pub fn contains(&self, name: &str) -> bool {
        self.assets
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .contains(name)
    }

    /// Names passed to `remove` for assets that existed
    pub fn removed(&self) -> Vec<String> {
        self.removed.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

#[async_trait]
impl AssetStore for FakeAssetStore {
    async fn exists(&self, name: &str) -> Result<bool, AssetError> {
        Ok(self.contains(name))
    }

    async fn remove(&self, name: &str) -> Result<(), AssetError> {
        let existed = self
            .assets
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(name);
        if existed {
            self.removed
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .push(name.to_string());
        }
        Ok(())
    }
}

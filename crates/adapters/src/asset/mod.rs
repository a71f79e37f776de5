// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Storage for uploaded team assets (shared background images)

mod fs;

pub use fs::FsAssetStore;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeAssetStore;

use async_trait::async_trait;
use thiserror::Error;

/// Errors from asset operations
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("invalid asset name: {0:?}")]
    InvalidName(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Adapter for asset files referenced from team records
#[async_trait]
pub trait AssetStore: Clone + Send + Sync + 'static {
    /// Whether the named asset exists
    async fn exists(&self, name: &str) -> Result<bool, AssetError>;

    /// Remove the named asset; removing a missing asset is not an error
    async fn remove(&self, name: &str) -> Result<(), AssetError>;
}

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
// Enable coverage(off) attribute for excluding test infrastructure
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Adapters for external I/O: the client gateway, the relational store and asset files

pub mod asset;
pub mod channel;
pub mod relational;
pub mod traced;

pub use asset::{AssetError, AssetStore, FsAssetStore};
pub use channel::{ChannelGateway, GatewayError, NoOpChannelGateway};
pub use relational::{RelationalError, RelationalStore, TransactionRow};
pub use traced::{TracedAssetStore, TracedChannelGateway};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
pub use asset::FakeAssetStore;
#[cfg(any(test, feature = "test-support"))]
pub use channel::{ChannelCall, FakeChannelGateway};
#[cfg(any(test, feature = "test-support"))]
pub use relational::{FakeRelationalStore, RelationalCall};

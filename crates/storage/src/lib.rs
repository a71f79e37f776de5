// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! ts-storage: locked team-record storage
//!
//! Records live in a [`RecordBackend`]. Every mutation runs inside a
//! per-team lock taken through the [`LockManager`], so concurrent requests
//! for the same team see serialized read-modify-write cycles.

pub mod backend;
pub mod lock;
pub mod memory;
pub mod operation;
pub mod state;
pub mod store;
pub mod wal;

pub use backend::{RecordBackend, StoreError};
pub use lock::{LockGuard, LockManager};
pub use memory::MemoryBackend;
pub use operation::RecordOp;
pub use state::MaterializedRecords;
pub use store::{team_key, TeamRecordStore};
pub use wal::{OpenedLog, Wal, WalError};

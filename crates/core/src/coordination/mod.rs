// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Coordination primitives
//!
//! - **Lease** - per-key exclusive access with TTL-based reclaim

pub mod lock;

pub use lock::{HolderId, Lease, LeaseConfig, LeaseInput, LeaseState};

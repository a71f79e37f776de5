// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! ts-core: shared types for the team synchronization layer
//!
//! This crate provides:
//! - The team record and its flat storage encoding
//! - The lease state machine behind per-team locks
//! - Deterministic per-team test ordering
//! - The immutable test catalog and configuration

pub mod catalog;
pub mod clock;
pub mod config;
pub mod coordination;
pub mod event;
pub mod message;
pub mod permutation;
pub mod record;
pub mod session;

// Re-exports
pub use catalog::{Catalog, CatalogError, ObjectKind, OperationKind, TestId, TestInfo};
pub use clock::{Clock, FakeClock, SystemClock};
pub use config::{ConfigError, SyncConfig, TestOrderPolicy, WaitPolicy};
pub use coordination::{HolderId, Lease, LeaseConfig, LeaseInput, LeaseState};
pub use event::Event;
pub use message::{Decision, MessageType, Operation, PermissionResponse};
pub use permutation::{factorial, generate_test_order, nth_permutation};
pub use record::{
    AccessCode, Fields, ParticipantSet, RecordError, TeamId, TeamRecord, INSTRUCTION_SCREEN,
    NO_COUNTDOWN,
};
pub use session::Session;

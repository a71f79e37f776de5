// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! ts-engine: coordination protocols over team records
//!
//! The readiness barrier gates screen advancement on a quorum of ready
//! participants, the condition waiter polls a record until a predicate
//! holds, and the session coordinator ties both to message delivery.

mod barrier;
mod error;
mod session;
mod waiter;

pub use barrier::{BarrierOutcome, GateRequest, ReadinessBarrier};
pub use error::{SessionError, WaitError};
pub use session::SessionCoordinator;
pub use waiter::{ConditionWaiter, WaitHandle};

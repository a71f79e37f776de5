// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Lease state machine for per-key exclusive access
//!
//! A lease is granted for a time-to-live. A holder that disappears without
//! releasing stops blocking the key once its lease expires.

use crate::clock::Clock;
use crate::event::Event;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Unique identifier for a lease holder
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HolderId(pub String);

impl HolderId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl std::fmt::Display for HolderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lease timing configuration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaseConfig {
    /// How long a grant lasts without a refresh
    #[serde(with = "humantime_serde")]
    pub ttl: Duration,
}

impl LeaseConfig {
    pub fn new(ttl: Duration) -> Self {
        Self { ttl }
    }
}

impl Default for LeaseConfig {
    fn default() -> Self {
        Self::new(Duration::from_secs(5))
    }
}

/// Lease state
#[derive(Clone, Debug)]
pub enum LeaseState {
    /// Nobody holds the key
    Free,
    /// Held until `expires_at`
    Held {
        holder: HolderId,
        expires_at: Instant,
    },
}

/// A lease on one key
#[derive(Clone, Debug)]
pub struct Lease {
    pub key: String,
    pub config: LeaseConfig,
    pub state: LeaseState,
}

/// Inputs that drive lease transitions
#[derive(Clone, Debug)]
pub enum LeaseInput {
    /// Attempt to take the lease
    Acquire { holder: HolderId },
    /// Give the lease back
    Release { holder: HolderId },
    /// Extend the current grant by another TTL
    Refresh { holder: HolderId },
    /// Drop an expired grant (called periodically)
    Tick,
}

impl Lease {
    pub fn new(key: impl Into<String>, config: LeaseConfig) -> Self {
        Self {
            key: key.into(),
            config,
            state: LeaseState::Free,
        }
    }

    pub fn is_free(&self) -> bool {
        matches!(self.state, LeaseState::Free)
    }

    pub fn is_held_by(&self, holder: &HolderId) -> bool {
        matches!(&self.state, LeaseState::Held { holder: h, .. } if h == holder)
    }

    pub fn holder(&self) -> Option<&HolderId> {
        match &self.state {
            LeaseState::Free => None,
            LeaseState::Held { holder, .. } => Some(holder),
        }
    }

    /// Whether the current grant has run past its TTL
    pub fn is_expired(&self, clock: &impl Clock) -> bool {
        match &self.state {
            LeaseState::Free => false,
            LeaseState::Held { expires_at, .. } => clock.now() >= *expires_at,
        }
    }

    fn grant(&self, holder: HolderId, clock: &impl Clock) -> LeaseState {
        LeaseState::Held {
            holder,
            expires_at: clock.now() + self.config.ttl,
        }
    }

    /// Pure state transition function
    pub fn transition(&self, input: LeaseInput, clock: &impl Clock) -> (Lease, Vec<Event>) {
        let mut next = self.clone();
        let mut events = Vec::new();

        match input {
            LeaseInput::Acquire { holder } => match &self.state {
                LeaseState::Free => {
                    next.state = self.grant(holder.clone(), clock);
                    events.push(Event::LeaseAcquired {
                        key: self.key.clone(),
                        holder: holder.0,
                    });
                }
                LeaseState::Held {
                    holder: current, ..
                } if self.is_expired(clock) => {
                    next.state = self.grant(holder.clone(), clock);
                    events.push(Event::LeaseReclaimed {
                        key: self.key.clone(),
                        previous_holder: current.0.clone(),
                        new_holder: holder.0.clone(),
                    });
                    events.push(Event::LeaseAcquired {
                        key: self.key.clone(),
                        holder: holder.0,
                    });
                }
                LeaseState::Held {
                    holder: current, ..
                } => {
                    events.push(Event::LeaseDenied {
                        key: self.key.clone(),
                        holder: holder.0,
                        current_holder: current.0.clone(),
                    });
                }
            },

            LeaseInput::Release { holder } => {
                // Releasing someone else's (or a reclaimed) lease is a no-op
                if self.is_held_by(&holder) {
                    next.state = LeaseState::Free;
                    events.push(Event::LeaseReleased {
                        key: self.key.clone(),
                        holder: holder.0,
                    });
                }
            }

            LeaseInput::Refresh { holder } => {
                if self.is_held_by(&holder) && !self.is_expired(clock) {
                    next.state = self.grant(holder, clock);
                }
            }

            LeaseInput::Tick => {
                if let LeaseState::Held { holder, .. } = &self.state {
                    if self.is_expired(clock) {
                        next.state = LeaseState::Free;
                        events.push(Event::LeaseExpired {
                            key: self.key.clone(),
                            holder: holder.0.clone(),
                        });
                    }
                }
            }
        }

        (next, events)
    }
}

#[cfg(test)]
#[path = "lock_tests.rs"]
mod tests;

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Events emitted by coordination state transitions

use serde::{Deserialize, Serialize};

/// Something that happened to a lease or a team record
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    // Lease events
    LeaseAcquired {
        key: String,
        holder: String,
    },
    LeaseReleased {
        key: String,
        holder: String,
    },
    LeaseDenied {
        key: String,
        holder: String,
        current_holder: String,
    },
    LeaseReclaimed {
        key: String,
        previous_holder: String,
        new_holder: String,
    },
    LeaseExpired {
        key: String,
        holder: String,
    },

    // Team events
    TeamCreated {
        team: u64,
    },
    ParticipantJoined {
        team: u64,
        code: String,
    },
    ParticipantLeft {
        team: u64,
        code: String,
    },
    BarrierGranted {
        team: u64,
        participants: usize,
    },
    TeamReset {
        team: u64,
    },
    TeamDeleted {
        team: u64,
    },
}

impl Event {
    /// Stable name used in log lines
    pub fn name(&self) -> &'static str {
        match self {
            Event::LeaseAcquired { .. } => "lease:acquired",
            Event::LeaseReleased { .. } => "lease:released",
            Event::LeaseDenied { .. } => "lease:denied",
            Event::LeaseReclaimed { .. } => "lease:reclaimed",
            Event::LeaseExpired { .. } => "lease:expired",
            Event::TeamCreated { .. } => "team:created",
            Event::ParticipantJoined { .. } => "team:joined",
            Event::ParticipantLeft { .. } => "team:left",
            Event::BarrierGranted { .. } => "team:barrier:granted",
            Event::TeamReset { .. } => "team:reset",
            Event::TeamDeleted { .. } => "team:deleted",
        }
    }

    /// Emit this event as a tracing record; lost lease holders log at warn
    pub fn log(&self) {
        match self {
            Event::LeaseReclaimed { .. } | Event::LeaseExpired { .. } => {
                tracing::warn!(event = self.name(), detail = ?self, "lease holder lost");
            }
            Event::LeaseAcquired { .. }
            | Event::LeaseReleased { .. }
            | Event::LeaseDenied { .. } => {
                tracing::trace!(event = self.name(), detail = ?self);
            }
            _ => tracing::info!(event = self.name(), detail = ?self),
        }
    }
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;

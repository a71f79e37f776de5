// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Participant session as seen by the synchronization layer

use crate::record::{AccessCode, TeamId};
use serde::{Deserialize, Serialize};

/// One participant's connection to a team
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Session {
    #[serde(rename = "TeamID")]
    pub team_id: TeamId,
    #[serde(rename = "UserID")]
    pub user_id: u32,
    pub access_code: AccessCode,
    /// Display name, used for the title edit lock
    pub name: String,
    /// Joined after the team passed the instruction screen
    pub late: bool,
}

impl Session {
    pub fn new(access_code: AccessCode, name: impl Into<String>) -> Self {
        Self {
            team_id: access_code.team_id(),
            user_id: access_code.user_id(),
            access_code,
            name: name.into(),
            late: false,
        }
    }

    pub fn with_late(mut self, late: bool) -> Self {
        self.late = late;
        self
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;

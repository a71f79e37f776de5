// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-team record and its flat field encoding
//!
//! Records are persisted as a `String -> String` field map. Membership sets
//! are comma-joined on the way out and parsed back into [`ParticipantSet`]
//! on the way in; nothing past this module sees the delimited form.

use crate::catalog::TestId;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Flat field map as stored by a record backend
pub type Fields = BTreeMap<String, String>;

/// StartTime value meaning "no countdown running"
pub const NO_COUNTDOWN: u64 = 9999;

/// Screen every test starts on
pub const INSTRUCTION_SCREEN: u32 = 1;

const SET_DELIMITER: char = ',';

pub mod field {
    pub const CURRENT_TEST: &str = "CurrentTest";
    pub const CURRENT_SCREEN: &str = "CurrentScreen";
    pub const TEXT_EDITING_USER: &str = "TextEditingUser";
    pub const START_TIME: &str = "StartTime";
    pub const TEST_TIME: &str = "TestTime";
    pub const IDEA_ID: &str = "IdeaId";
    pub const PARTICIPANTS: &str = "Participants";
    pub const READY_TO_START: &str = "ReadyToStart";
    pub const PIC_CON_BG_CREATOR: &str = "PicConBGCreator";
    pub const PIC_CON_BG_IMAGE: &str = "PicConBGImage";
    pub const DEMO_STOP_TIMER: &str = "DemoStopTimer";
    pub const TESTS_ORDER: &str = "TestsOrder";
}

/// Errors decoding a record or its parts
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecordError {
    #[error("missing field {0}")]
    MissingField(&'static str),
    #[error("invalid value {value:?} for field {field}")]
    InvalidField { field: &'static str, value: String },
    #[error("invalid access code: {0:?}")]
    InvalidAccessCode(String),
    #[error("invalid team id: {0:?}")]
    InvalidTeamId(String),
}

/// Team identifier, always positive
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub struct TeamId(u64);

impl TeamId {
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for TeamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TeamId {
    type Err = RecordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id: u64 = s
            .trim()
            .parse()
            .map_err(|_| RecordError::InvalidTeamId(s.to_string()))?;
        Self::try_from(id)
    }
}

impl TryFrom<u64> for TeamId {
    type Error = RecordError;

    fn try_from(id: u64) -> Result<Self, Self::Error> {
        if id == 0 {
            return Err(RecordError::InvalidTeamId(id.to_string()));
        }
        Ok(Self(id))
    }
}

impl From<TeamId> for u64 {
    fn from(team: TeamId) -> Self {
        team.0
    }
}

/// Participant access code of the form `s<team>p<user>`
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AccessCode {
    team: u64,
    user: u32,
}

impl AccessCode {
    pub fn new(team: TeamId, user: u32) -> Self {
        Self {
            team: team.get(),
            user,
        }
    }

    pub fn team_id(&self) -> TeamId {
        TeamId(self.team)
    }

    pub fn user_id(&self) -> u32 {
        self.user
    }
}

impl fmt::Display for AccessCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "s{}p{}", self.team, self.user)
    }
}

impl FromStr for AccessCode {
    type Err = RecordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || RecordError::InvalidAccessCode(s.to_string());
        let rest = s.strip_prefix('s').ok_or_else(invalid)?;
        let (team, user) = rest.split_once('p').ok_or_else(invalid)?;
        let all_digits = |part: &str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());
        if !all_digits(team) || !all_digits(user) {
            return Err(invalid());
        }
        let team: u64 = team.parse().map_err(|_| invalid())?;
        if team == 0 {
            return Err(invalid());
        }
        Ok(Self {
            team,
            user: user.parse().map_err(|_| invalid())?,
        })
    }
}

impl TryFrom<String> for AccessCode {
    type Error = RecordError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<AccessCode> for String {
    fn from(code: AccessCode) -> Self {
        code.to_string()
    }
}

/// Unordered set of access codes
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantSet(BTreeSet<AccessCode>);

impl ParticipantSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a code; returns false if it was already present
    pub fn insert(&mut self, code: AccessCode) -> bool {
        self.0.insert(code)
    }

    /// Remove a code; returns false if it was absent
    pub fn remove(&mut self, code: &AccessCode) -> bool {
        self.0.remove(code)
    }

    pub fn contains(&self, code: &AccessCode) -> bool {
        self.0.contains(code)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn is_subset(&self, other: &ParticipantSet) -> bool {
        self.0.is_subset(&other.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = &AccessCode> {
        self.0.iter()
    }

    /// Comma-joined storage form
    pub fn encode(&self) -> String {
        self.0
            .iter()
            .map(AccessCode::to_string)
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Parse the storage form; empty entries are ignored, duplicates collapse
    pub fn decode(field: &'static str, raw: &str) -> Result<Self, RecordError> {
        raw.split(SET_DELIMITER)
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(|item| {
                item.parse().map_err(|_| RecordError::InvalidField {
                    field,
                    value: item.to_string(),
                })
            })
            .collect::<Result<BTreeSet<_>, _>>()
            .map(Self)
    }
}

impl FromIterator<AccessCode> for ParticipantSet {
    fn from_iter<I: IntoIterator<Item = AccessCode>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Shared state of one team session
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TeamRecord {
    pub current_test: TestId,
    pub current_screen: u32,
    pub text_editing_user: Option<String>,
    /// Countdown start in epoch ms; `None` when no countdown runs
    pub start_time: Option<u64>,
    /// Countdown length in ms
    pub test_time: u64,
    pub idea_id: u64,
    pub participants: ParticipantSet,
    pub ready_to_start: ParticipantSet,
    #[serde(rename = "PicConBGCreator")]
    pub pic_con_bg_creator: Option<AccessCode>,
    #[serde(rename = "PicConBGImage")]
    pub pic_con_bg_image: Option<String>,
    pub demo_stop_timer: bool,
    pub tests_order: Vec<TestId>,
}

impl TeamRecord {
    /// Fresh record with default fields
    pub fn new(tests_order: Vec<TestId>, demo_stop_timer: bool) -> Self {
        Self {
            current_test: TestId::PracArea,
            current_screen: INSTRUCTION_SCREEN,
            text_editing_user: None,
            start_time: None,
            test_time: 0,
            idea_id: 1,
            participants: ParticipantSet::new(),
            ready_to_start: ParticipantSet::new(),
            pic_con_bg_creator: None,
            pic_con_bg_image: None,
            demo_stop_timer,
            tests_order,
        }
    }

    /// Back to defaults, keeping the test order
    pub fn reset(&mut self, demo_stop_timer: bool) {
        let order = std::mem::take(&mut self.tests_order);
        *self = Self::new(order, demo_stop_timer);
    }

    /// Add a participant; false if already a member
    pub fn join(&mut self, code: AccessCode) -> bool {
        self.participants.insert(code)
    }

    /// Remove a participant from both membership sets
    pub fn leave(&mut self, code: &AccessCode) -> bool {
        self.ready_to_start.remove(code);
        self.participants.remove(code)
    }

    /// Mark a participant ready, joining them first if needed
    pub fn mark_ready(&mut self, code: AccessCode) {
        self.participants.insert(code.clone());
        self.ready_to_start.insert(code);
    }

    /// Quorum check: everybody ready and at least two of them
    pub fn all_ready(&self) -> bool {
        self.ready_to_start.len() >= 2 && self.ready_to_start == self.participants
    }

    /// Claim the title edit lock for `name`; returns the holder afterwards
    pub fn claim_text_editing(&mut self, name: &str) -> &str {
        self.text_editing_user
            .get_or_insert_with(|| name.to_string())
            .as_str()
    }

    /// Claim background authorship; returns the creator afterwards
    pub fn claim_background_creator(&mut self, code: AccessCode) -> &AccessCode {
        self.pic_con_bg_creator.get_or_insert(code)
    }

    /// Hand out the current idea id and advance the counter
    ///
    /// Returns `None`, leaving the counter alone, once it cannot advance.
    pub fn next_idea_id(&mut self) -> Option<u64> {
        let id = self.idea_id;
        self.idea_id = id.checked_add(1)?;
        Some(id)
    }

    pub fn start_countdown(&mut self, now_ms: u64, duration_ms: u64) {
        self.start_time = Some(now_ms);
        self.test_time = duration_ms;
    }

    /// Clear an elapsed countdown; true if one was cleared
    pub fn expire_countdown(&mut self, now_ms: u64) -> bool {
        match self.start_time {
            Some(start) if now_ms >= start.saturating_add(self.test_time) => {
                self.start_time = None;
                self.test_time = 0;
                true
            }
            _ => false,
        }
    }

    /// Encode into the flat storage form
    pub fn to_fields(&self) -> Fields {
        let order = self
            .tests_order
            .iter()
            .map(|t| t.code().to_string())
            .collect::<Vec<_>>()
            .join(",");

        [
            (field::CURRENT_TEST, self.current_test.code().to_string()),
            (field::CURRENT_SCREEN, self.current_screen.to_string()),
            (
                field::TEXT_EDITING_USER,
                self.text_editing_user.clone().unwrap_or_default(),
            ),
            (
                field::START_TIME,
                self.start_time.unwrap_or(NO_COUNTDOWN).to_string(),
            ),
            (field::TEST_TIME, self.test_time.to_string()),
            (field::IDEA_ID, self.idea_id.to_string()),
            (field::PARTICIPANTS, self.participants.encode()),
            (field::READY_TO_START, self.ready_to_start.encode()),
            (
                field::PIC_CON_BG_CREATOR,
                self.pic_con_bg_creator
                    .as_ref()
                    .map(AccessCode::to_string)
                    .unwrap_or_default(),
            ),
            (
                field::PIC_CON_BG_IMAGE,
                self.pic_con_bg_image.clone().unwrap_or_default(),
            ),
            (field::DEMO_STOP_TIMER, self.demo_stop_timer.to_string()),
            (field::TESTS_ORDER, order),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
    }

    /// Decode from the flat storage form
    pub fn from_fields(fields: &Fields) -> Result<Self, RecordError> {
        let raw = |name: &'static str| {
            fields
                .get(name)
                .map(String::as_str)
                .ok_or(RecordError::MissingField(name))
        };
        let invalid = |field: &'static str, value: &str| RecordError::InvalidField {
            field,
            value: value.to_string(),
        };
        let number = |name: &'static str| -> Result<u64, RecordError> {
            let value = raw(name)?;
            value.trim().parse().map_err(|_| invalid(name, value))
        };
        let test_id = |name: &'static str, value: &str| -> Result<TestId, RecordError> {
            value
                .trim()
                .parse::<u8>()
                .ok()
                .and_then(TestId::from_code)
                .ok_or_else(|| invalid(name, value))
        };
        let optional = |name: &'static str| -> Result<Option<String>, RecordError> {
            let value = raw(name)?;
            Ok((!value.is_empty()).then(|| value.to_string()))
        };

        let current_test = test_id(field::CURRENT_TEST, raw(field::CURRENT_TEST)?)?;
        let current_screen = u32::try_from(number(field::CURRENT_SCREEN)?)
            .map_err(|_| invalid(field::CURRENT_SCREEN, raw(field::CURRENT_SCREEN).unwrap_or("")))?;
        let start_time = match number(field::START_TIME)? {
            NO_COUNTDOWN => None,
            start => Some(start),
        };
        let pic_con_bg_creator = optional(field::PIC_CON_BG_CREATOR)?
            .map(|code| code.parse().map_err(|_| invalid(field::PIC_CON_BG_CREATOR, &code)))
            .transpose()?;
        let demo_raw = raw(field::DEMO_STOP_TIMER)?;
        let demo_stop_timer = match demo_raw.trim() {
            "true" | "1" => true,
            "false" | "0" => false,
            other => return Err(invalid(field::DEMO_STOP_TIMER, other)),
        };
        let tests_order = raw(field::TESTS_ORDER)?
            .split(SET_DELIMITER)
            .filter(|item| !item.trim().is_empty())
            .map(|item| test_id(field::TESTS_ORDER, item))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            current_test,
            current_screen,
            text_editing_user: optional(field::TEXT_EDITING_USER)?,
            start_time,
            test_time: number(field::TEST_TIME)?,
            idea_id: number(field::IDEA_ID)?,
            participants: ParticipantSet::decode(field::PARTICIPANTS, raw(field::PARTICIPANTS)?)?,
            ready_to_start: ParticipantSet::decode(
                field::READY_TO_START,
                raw(field::READY_TO_START)?,
            )?,
            pic_con_bg_creator,
            pic_con_bg_image: optional(field::PIC_CON_BG_IMAGE)?,
            demo_stop_timer,
            tests_order,
        })
    }
}

#[cfg(test)]
#[path = "record_tests.rs"]
mod tests;

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Immutable test metadata shared by every component
//!
//! Built once at startup and handed around behind an `Arc`.

use crate::message::MessageType;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors raised while building or querying the catalog
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("unknown test id: {0}")]
    UnknownTest(String),
    #[error("no message mapped for {object:?}/{operation:?}")]
    MissingMessage {
        object: ObjectKind,
        operation: OperationKind,
    },
    #[error("message mapped for unsupported pair {object:?}/{operation:?}")]
    UnsupportedPair {
        object: ObjectKind,
        operation: OperationKind,
    },
    #[error("test order needs at least two anchors, got {0} tests")]
    OrderTooShort(usize),
    #[error("test {0} appears more than once in the order")]
    DuplicateInOrder(TestId),
    #[error("test {0} in the order has no catalog entry")]
    OrderWithoutInfo(TestId),
}

/// Test activity identifier
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TestId {
    PracArea,
    PicCon,
    PicComp,
    ParLines,
    IdeaGen,
    DesChal,
    AltUses,
}

impl TestId {
    pub const ALL: [TestId; 7] = [
        TestId::PracArea,
        TestId::PicCon,
        TestId::PicComp,
        TestId::ParLines,
        TestId::IdeaGen,
        TestId::DesChal,
        TestId::AltUses,
    ];

    /// Numeric id used in persisted records
    pub fn code(&self) -> u8 {
        match self {
            TestId::PracArea => 0,
            TestId::PicCon => 1,
            TestId::PicComp => 2,
            TestId::ParLines => 3,
            TestId::IdeaGen => 4,
            TestId::DesChal => 5,
            TestId::AltUses => 6,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.code() == code)
    }

    pub fn name(&self) -> &'static str {
        match self {
            TestId::PracArea => "PracArea",
            TestId::PicCon => "PicCon",
            TestId::PicComp => "PicComp",
            TestId::ParLines => "ParLines",
            TestId::IdeaGen => "IdeaGen",
            TestId::DesChal => "DesChal",
            TestId::AltUses => "AltUses",
        }
    }
}

impl fmt::Display for TestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TestId {
    type Err = CatalogError;

    /// Accepts either the numeric code or the test name
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(code) = s.parse::<u8>() {
            return Self::from_code(code).ok_or_else(|| CatalogError::UnknownTest(s.to_string()));
        }
        Self::ALL
            .into_iter()
            .find(|t| t.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| CatalogError::UnknownTest(s.to_string()))
    }
}

/// Static description of one test activity
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestInfo {
    pub id: TestId,
    pub screen_limit: u32,
    pub instruction_url: String,
    pub test_url: String,
}

impl TestInfo {
    fn new(id: TestId, screen_limit: u32, instruction_url: &str, test_url: &str) -> Self {
        Self {
            id,
            screen_limit,
            instruction_url: instruction_url.to_string(),
            test_url: test_url.to_string(),
        }
    }
}

/// Kind of shared object a participant manipulates
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectKind {
    Dot,
    Title,
    Object,
    Idea,
}

/// Kind of manipulation applied to a shared object
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperationKind {
    Draw,
    Erase,
    Add,
    Del,
    Update,
    Undo,
    Redo,
}

/// Pairs that must have a broadcast message
pub const SUPPORTED_PAIRS: [(ObjectKind, OperationKind); 8] = [
    (ObjectKind::Dot, OperationKind::Draw),
    (ObjectKind::Dot, OperationKind::Erase),
    (ObjectKind::Title, OperationKind::Add),
    (ObjectKind::Object, OperationKind::Undo),
    (ObjectKind::Object, OperationKind::Redo),
    (ObjectKind::Idea, OperationKind::Add),
    (ObjectKind::Idea, OperationKind::Del),
    (ObjectKind::Idea, OperationKind::Update),
];

/// Mapping from (object, operation) to the message broadcast for it
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MessageMap {
    entries: HashMap<(ObjectKind, OperationKind), MessageType>,
}

impl MessageMap {
    /// Build a map, rejecting missing or unsupported pairs
    pub fn new(
        entries: impl IntoIterator<Item = ((ObjectKind, OperationKind), MessageType)>,
    ) -> Result<Self, CatalogError> {
        let entries: HashMap<_, _> = entries.into_iter().collect();

        if let Some(&(object, operation)) = entries
            .keys()
            .find(|pair| !SUPPORTED_PAIRS.contains(pair))
        {
            return Err(CatalogError::UnsupportedPair { object, operation });
        }
        if let Some(&(object, operation)) = SUPPORTED_PAIRS
            .iter()
            .find(|pair| !entries.contains_key(pair))
        {
            return Err(CatalogError::MissingMessage { object, operation });
        }

        Ok(Self { entries })
    }

    pub fn standard() -> Result<Self, CatalogError> {
        Self::new([
            ((ObjectKind::Dot, OperationKind::Draw), MessageType::Draw),
            ((ObjectKind::Dot, OperationKind::Erase), MessageType::Erase),
            ((ObjectKind::Title, OperationKind::Add), MessageType::UpdateTitle),
            ((ObjectKind::Object, OperationKind::Undo), MessageType::Undo),
            ((ObjectKind::Object, OperationKind::Redo), MessageType::Redo),
            ((ObjectKind::Idea, OperationKind::Add), MessageType::AddIdea),
            ((ObjectKind::Idea, OperationKind::Del), MessageType::DelIdea),
            ((ObjectKind::Idea, OperationKind::Update), MessageType::UpdateIdea),
        ])
    }

    pub fn get(&self, object: ObjectKind, operation: OperationKind) -> Option<MessageType> {
        self.entries.get(&(object, operation)).copied()
    }
}

/// Test list, canonical ordering, colours and message map
#[derive(Clone, Debug)]
pub struct Catalog {
    tests: Vec<TestInfo>,
    canonical_order: Vec<TestId>,
    colours: Vec<String>,
    messages: MessageMap,
}

impl Catalog {
    /// Build a catalog, validating the canonical order against the test list
    pub fn new(
        tests: Vec<TestInfo>,
        canonical_order: Vec<TestId>,
        colours: Vec<String>,
        messages: MessageMap,
    ) -> Result<Self, CatalogError> {
        if canonical_order.len() < 2 {
            return Err(CatalogError::OrderTooShort(canonical_order.len()));
        }
        for (i, id) in canonical_order.iter().enumerate() {
            if canonical_order[..i].contains(id) {
                return Err(CatalogError::DuplicateInOrder(*id));
            }
            if !tests.iter().any(|t| t.id == *id) {
                return Err(CatalogError::OrderWithoutInfo(*id));
            }
        }

        Ok(Self {
            tests,
            canonical_order,
            colours,
            messages,
        })
    }

    /// The catalog used by the experiment
    pub fn standard() -> Result<Self, CatalogError> {
        let tests = vec![
            TestInfo::new(
                TestId::PracArea,
                1,
                "/tests/introduction.html",
                "/tests/practice_area.html",
            ),
            TestInfo::new(TestId::PicCon, 1, "/tests/pic_con_inst.html", "/tests/pic_con.html"),
            TestInfo::new(TestId::PicComp, 10, "/tests/pic_comp_inst.html", "/tests/pic_comp.html"),
            TestInfo::new(
                TestId::ParLines,
                18,
                "/tests/par_lines_inst.html",
                "/tests/par_lines.html",
            ),
            TestInfo::new(TestId::IdeaGen, 1, "/tests/idea_gen_inst.html", "/tests/idea_gen.html"),
            TestInfo::new(TestId::DesChal, 99, "", ""),
            TestInfo::new(TestId::AltUses, 1, "", ""),
        ];
        let order = vec![
            TestId::PracArea,
            TestId::PicComp,
            TestId::ParLines,
            TestId::IdeaGen,
            TestId::DesChal,
            TestId::AltUses,
            TestId::PicCon,
        ];
        let colours = ["", "purple", "red", "blue", "orange", "green"]
            .into_iter()
            .map(String::from)
            .collect();

        Self::new(tests, order, colours, MessageMap::standard()?)
    }

    pub fn test_info(&self, id: TestId) -> Option<&TestInfo> {
        self.tests.iter().find(|t| t.id == id)
    }

    pub fn screen_limit(&self, id: TestId) -> Option<u32> {
        self.test_info(id).map(|t| t.screen_limit)
    }

    pub fn instruction_url(&self, id: TestId) -> Option<&str> {
        self.test_info(id).map(|t| t.instruction_url.as_str())
    }

    pub fn test_url(&self, id: TestId) -> Option<&str> {
        self.test_info(id).map(|t| t.test_url.as_str())
    }

    /// Canonical ordering; first and last entries are the fixed anchors
    pub fn canonical_order(&self) -> &[TestId] {
        &self.canonical_order
    }

    /// Test following `current` in `order`, if any
    pub fn next_test(&self, order: &[TestId], current: TestId) -> Option<TestId> {
        let pos = order.iter().position(|t| *t == current)?;
        order.get(pos + 1).copied()
    }

    /// Display colour for a participant; empty for unknown users
    pub fn user_colour(&self, user_id: u32) -> &str {
        self.colours
            .get(user_id as usize)
            .map(String::as_str)
            .unwrap_or("")
    }

    pub fn message(&self, object: ObjectKind, operation: OperationKind) -> Option<MessageType> {
        self.messages.get(object, operation)
    }
}

#[cfg(test)]
#[path = "catalog_tests.rs"]
mod tests;

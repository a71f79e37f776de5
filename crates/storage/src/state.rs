// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Materialized record map built from WAL replay

use crate::operation::RecordOp;
use std::collections::BTreeMap;
use ts_core::Fields;

/// Current field map of every stored record
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MaterializedRecords {
    records: BTreeMap<String, Fields>,
}

impl MaterializedRecords {
    /// Rebuild state by applying operations in order
    pub fn from_ops<'a>(ops: impl IntoIterator<Item = &'a RecordOp>) -> Self {
        let mut state = Self::default();
        for op in ops {
            state.apply(op);
        }
        state
    }

    pub fn get(&self, key: &str) -> Option<&Fields> {
        self.records.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.records.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.records.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// One `Put` per record, in key order
    pub fn to_ops(&self) -> Vec<RecordOp> {
        self.records
            .iter()
            .map(|(key, fields)| RecordOp::Put {
                key: key.clone(),
                fields: fields.clone(),
            })
            .collect()
    }

    /// Apply an operation to update the state
    pub fn apply(&mut self, op: &RecordOp) {
        match op {
            RecordOp::Put { key, fields } => {
                self.records.insert(key.clone(), fields.clone());
            }
            RecordOp::Delete { key } => {
                self.records.remove(key);
            }
        }
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Durable record operations

use serde::{Deserialize, Serialize};
use ts_core::Fields;

/// A change to the record map, as written to the WAL
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RecordOp {
    /// Replace all fields of a record
    Put { key: String, fields: Fields },
    /// Remove a record
    Delete { key: String },
}

impl RecordOp {
    pub fn key(&self) -> &str {
        match self {
            RecordOp::Put { key, .. } | RecordOp::Delete { key } => key,
        }
    }
}

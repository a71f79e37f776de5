// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Message identifiers pushed to participants through the channel gateway

use serde::{Deserialize, Serialize};
use std::fmt;

/// Message type carried by every outgoing gateway message
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageType {
    GetTestStateRsp,
    GetSessionStateRsp,
    TestComplete,
    GetResultsReq,
    BackendReady,
    IsBackendReadyRsp,
    PermRsp,
    TitleBeingEdited,
    UpdateTitle,
    Transaction,
    EndData,
    GetTestInstructionRsp,
    GetIntroductionRsp,
    Goto,
    Draw,
    Erase,
    Undo,
    Redo,
    AddIdea,
    DelIdea,
    UpdateIdea,
    /// Backend could not complete the request; the client should retry
    TryAgain,
}

impl MessageType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageType::GetTestStateRsp => "get_test_state_rsp",
            MessageType::GetSessionStateRsp => "get_session_state_rsp",
            MessageType::TestComplete => "test_complete",
            MessageType::GetResultsReq => "get_results_req",
            MessageType::BackendReady => "backend_ready",
            MessageType::IsBackendReadyRsp => "is_backend_ready_rsp",
            MessageType::PermRsp => "perm_rsp",
            MessageType::TitleBeingEdited => "title_being_edited",
            MessageType::UpdateTitle => "update_title",
            MessageType::Transaction => "transaction",
            MessageType::EndData => "end_data",
            MessageType::GetTestInstructionRsp => "get_test_instruction_rsp",
            MessageType::GetIntroductionRsp => "get_introduction_rsp",
            MessageType::Goto => "goto",
            MessageType::Draw => "draw",
            MessageType::Erase => "erase",
            MessageType::Undo => "undo",
            MessageType::Redo => "redo",
            MessageType::AddIdea => "add_idea",
            MessageType::DelIdea => "del_idea",
            MessageType::UpdateIdea => "update_idea",
            MessageType::TryAgain => "try_again",
        }
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Privileged operations a participant asks permission for
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    StartTest,
    NextScreen,
    EditTitle,
}

/// Outcome of a permission request
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    Granted,
    Declined,
}

/// Payload of a [`MessageType::PermRsp`] message
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionResponse {
    pub decision: Decision,
    pub operation: Operation,
    /// Extra context, e.g. who currently holds the title lock
    #[serde(skip_serializing_if = "Option::is_none")]
    pub info: Option<String>,
}

impl PermissionResponse {
    pub fn granted(operation: Operation) -> Self {
        Self {
            decision: Decision::Granted,
            operation,
            info: None,
        }
    }

    pub fn declined(operation: Operation, info: impl Into<String>) -> Self {
        Self {
            decision: Decision::Declined,
            operation,
            info: Some(info.into()),
        }
    }
}

#[cfg(test)]
#[path = "message_tests.rs"]
mod tests;

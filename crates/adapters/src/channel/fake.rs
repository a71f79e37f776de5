// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake channel gateway for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{ChannelGateway, GatewayError};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::{Arc, Mutex};
use ts_core::{AccessCode, MessageType, TeamId};

/// Recorded gateway call
#[derive(Debug, Clone, PartialEq)]
pub enum ChannelCall {
    ToUser {
        user: AccessCode,
        message: MessageType,
        payload: Value,
    },
    ToTeam {
        team: TeamId,
        message: MessageType,
        payload: Value,
    },
    ToMinimalId {
        team: TeamId,
        message: MessageType,
    },
    LeaveTeam {
        user: AccessCode,
        team: TeamId,
    },
    Disconnect {
        user: AccessCode,
    },
}

/// Fake gateway that records every call
#[derive(Clone, Default)]
pub struct FakeChannelGateway {
    calls: Arc<Mutex<Vec<ChannelCall>>>,
}

impl FakeChannelGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<ChannelCall> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Messages of a given type, in send order
    pub fn sent(&self, message: MessageType) -> Vec<ChannelCall> {
        self.calls()
            .into_iter()
            .filter(|call| match call {
                ChannelCall::ToUser { message: m, .. }
                | ChannelCall::ToTeam { message: m, .. }
                | ChannelCall::ToMinimalId { message: m, .. } => *m == message,
                _ => false,
            })
            .collect()
    }

    fn record(&self, call: ChannelCall) {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(call);
    }
}

#[async_trait]
impl ChannelGateway for FakeChannelGateway {
    async fn send_to_user(
        &self,
        user: &AccessCode,
        message: MessageType,
        payload: Value,
    ) -> Result<(), GatewayError> {
        self.record(ChannelCall::ToUser {
            user: user.clone(),
            message,
            payload,
        });
        Ok(())
    }

    async fn send_to_team(
        &self,
        team: TeamId,
        message: MessageType,
        payload: Value,
    ) -> Result<(), GatewayError> {
        self.record(ChannelCall::ToTeam {
            team,
            message,
            payload,
        });
        Ok(())
    }

    async fn send_to_minimal_id(
        &self,
        team: TeamId,
        message: MessageType,
    ) -> Result<(), GatewayError> {
        self.record(ChannelCall::ToMinimalId { team, message });
        Ok(())
    }

    async fn leave_team(&self, user: &AccessCode, team: TeamId) -> Result<(), GatewayError> {
        self.record(ChannelCall::LeaveTeam {
            user: user.clone(),
            team,
        });
        Ok(())
    }

    async fn disconnect(&self, user: &AccessCode) -> Result<(), GatewayError> {
        self.record(ChannelCall::Disconnect { user: user.clone() });
        Ok(())
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;

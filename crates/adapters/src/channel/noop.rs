// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! No-op gateway for running without connected clients.

use super::{ChannelGateway, GatewayError};
use async_trait::async_trait;
use serde_json::Value;
use ts_core::{AccessCode, MessageType, TeamId};

/// Gateway that drops every message.
///
/// Used by the operator CLI, which has no clients to notify.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoOpChannelGateway;

impl NoOpChannelGateway {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ChannelGateway for NoOpChannelGateway {
    async fn send_to_user(
        &self,
        _user: &AccessCode,
        _message: MessageType,
        _payload: Value,
    ) -> Result<(), GatewayError> {
        Ok(())
    }

    async fn send_to_team(
        &self,
        _team: TeamId,
        _message: MessageType,
        _payload: Value,
    ) -> Result<(), GatewayError> {
        Ok(())
    }

    async fn send_to_minimal_id(
        &self,
        _team: TeamId,
        _message: MessageType,
    ) -> Result<(), GatewayError> {
        Ok(())
    }

    async fn leave_team(&self, _user: &AccessCode, _team: TeamId) -> Result<(), GatewayError> {
        Ok(())
    }

    async fn disconnect(&self, _user: &AccessCode) -> Result<(), GatewayError> {
        Ok(())
    }
}

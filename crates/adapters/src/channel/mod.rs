// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Message delivery to participants' browsers

mod noop;

pub use noop::NoOpChannelGateway;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{ChannelCall, FakeChannelGateway};

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;
use ts_core::{AccessCode, MessageType, TeamId};

/// Errors from gateway operations
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("user not connected: {0}")]
    NotConnected(String),
    #[error("delivery failed: {0}")]
    DeliveryFailed(String),
}

/// Adapter for the pub/sub gateway that pushes messages to clients
#[async_trait]
pub trait ChannelGateway: Clone + Send + Sync + 'static {
    /// Send to one participant
    async fn send_to_user(
        &self,
        user: &AccessCode,
        message: MessageType,
        payload: Value,
    ) -> Result<(), GatewayError>;

    /// Broadcast to every participant of a team
    async fn send_to_team(
        &self,
        team: TeamId,
        message: MessageType,
        payload: Value,
    ) -> Result<(), GatewayError>;

    /// Send to the lowest-ranked member of a team
    async fn send_to_minimal_id(&self, team: TeamId, message: MessageType)
        -> Result<(), GatewayError>;

    /// Unsubscribe a participant from the team channel
    async fn leave_team(&self, user: &AccessCode, team: TeamId) -> Result<(), GatewayError>;

    /// Drop the participant's connection
    async fn disconnect(&self, user: &AccessCode) -> Result<(), GatewayError>;
}

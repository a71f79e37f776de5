// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced adapter wrappers for consistent observability

use crate::asset::{AssetError, AssetStore};
use crate::channel::{ChannelGateway, GatewayError};
use async_trait::async_trait;
use serde_json::Value;
use tracing::Instrument;
use ts_core::{AccessCode, MessageType, TeamId};

/// Wrapper that adds tracing to any ChannelGateway
#[derive(Clone)]
pub struct TracedChannelGateway<G> {
    inner: G,
}

impl<G> TracedChannelGateway<G> {
    pub fn new(inner: G) -> Self {
        Self { inner }
    }
}

fn log_delivery(result: &Result<(), GatewayError>) {
    match result {
        Ok(()) => tracing::debug!("delivered"),
        Err(e) => tracing::warn!(error = %e, "delivery failed"),
    }
}

#[async_trait]
impl<G: ChannelGateway> ChannelGateway for TracedChannelGateway<G> {
    async fn send_to_user(
        &self,
        user: &AccessCode,
        message: MessageType,
        payload: Value,
    ) -> Result<(), GatewayError> {
        let span = tracing::debug_span!("channel.send_to_user", %user, %message);
        async {
            let result = self.inner.send_to_user(user, message, payload).await;
            log_delivery(&result);
            result
        }
        .instrument(span)
        .await
    }

    async fn send_to_team(
        &self,
        team: TeamId,
        message: MessageType,
        payload: Value,
    ) -> Result<(), GatewayError> {
        let span = tracing::debug_span!("channel.send_to_team", %team, %message);
        async {
            let result = self.inner.send_to_team(team, message, payload).await;
            log_delivery(&result);
            result
        }
        .instrument(span)
        .await
    }

    async fn send_to_minimal_id(
        &self,
        team: TeamId,
        message: MessageType,
    ) -> Result<(), GatewayError> {
        let span = tracing::debug_span!("channel.send_to_minimal_id", %team, %message);
        async {
            let result = self.inner.send_to_minimal_id(team, message).await;
            log_delivery(&result);
            result
        }
        .instrument(span)
        .await
    }

    async fn leave_team(&self, user: &AccessCode, team: TeamId) -> Result<(), GatewayError> {
        let result = self.inner.leave_team(user, team).await;
        match &result {
            Ok(()) => tracing::info!(%user, %team, "left team channel"),
            Err(e) => tracing::warn!(%user, %team, error = %e, "leave failed"),
        }
        result
    }

    async fn disconnect(&self, user: &AccessCode) -> Result<(), GatewayError> {
        let result = self.inner.disconnect(user).await;
        // disconnect() failing is often acceptable (client already gone)
        match &result {
            Ok(()) => tracing::info!(%user, "disconnected"),
            Err(e) => tracing::warn!(%user, error = %e, "disconnect failed (may be expected)"),
        }
        result
    }
}

/// Wrapper that adds tracing to any AssetStore
#[derive(Clone)]
pub struct TracedAssetStore<A> {
    inner: A,
}

impl<A> TracedAssetStore<A> {
    pub fn new(inner: A) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<A: AssetStore> AssetStore for TracedAssetStore<A> {
    async fn exists(&self, name: &str) -> Result<bool, AssetError> {
        let result = self.inner.exists(name).await;
        tracing::trace!(name, exists = ?result.as_ref().ok(), "checked");
        result
    }

    async fn remove(&self, name: &str) -> Result<(), AssetError> {
        let span = tracing::info_span!("asset.remove", name);
        async {
            let start = std::time::Instant::now();
            let result = self.inner.remove(name).await;
            let elapsed_ms = start.elapsed().as_millis() as u64;
            match &result {
                Ok(()) => tracing::info!(elapsed_ms, "asset removed"),
                Err(e) => tracing::error!(elapsed_ms, error = %e, "remove failed"),
            }
            result
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-participant request handling
//!
//! The coordinator is what test modules call on behalf of one participant:
//! it reads and mutates the team record, applies the readiness barrier and
//! pushes the resulting messages through the gateway. A failing record
//! store is reported back to the participant as a `TryAgain` message.

use crate::barrier::{BarrierOutcome, GateRequest, ReadinessBarrier};
use crate::error::SessionError;
use serde_json::{json, Value};
use std::path::PathBuf;
use std::time::Duration;
use tokio::task::JoinHandle;
use ts_adapters::{AssetStore, ChannelGateway, RelationalStore};
use ts_core::{
    AccessCode, Clock, Decision, MessageType, ObjectKind, Operation, OperationKind,
    PermissionResponse, Session, TeamRecord, TestId,
};
use ts_storage::{RecordBackend, StoreError, TeamRecordStore};

/// Grace period between a countdown's end and the expiry check
const EXPIRY_GRACE: Duration = Duration::from_secs(1);

/// Coordinates one team's shared state with message delivery
#[derive(Clone)]
pub struct SessionCoordinator<B, A, C, G, R> {
    store: TeamRecordStore<B, A, C>,
    barrier: ReadinessBarrier<B, A, C>,
    gateway: G,
    relational: R,
}

impl<B, A, C, G, R> SessionCoordinator<B, A, C, G, R>
where
    B: RecordBackend,
    A: AssetStore,
    C: Clock,
    G: ChannelGateway,
    R: RelationalStore,
{
    pub fn new(store: TeamRecordStore<B, A, C>, gateway: G, relational: R) -> Self {
        Self {
            barrier: ReadinessBarrier::new(store.clone()),
            store,
            gateway,
            relational,
        }
    }

    pub fn store(&self) -> &TeamRecordStore<B, A, C> {
        &self.store
    }

    /// Pass a store result through, telling the participant to retry on failure
    async fn checked<T>(
        &self,
        session: &Session,
        result: Result<T, StoreError>,
    ) -> Result<T, SessionError> {
        match result {
            Ok(value) => Ok(value),
            Err(e) => {
                tracing::warn!(code = %session.access_code, error = %e, "record store failed");
                if let Err(send_err) = self
                    .gateway
                    .send_to_user(&session.access_code, MessageType::TryAgain, Value::Null)
                    .await
                {
                    tracing::warn!(error = %send_err, "could not ask participant to retry");
                }
                Err(e.into())
            }
        }
    }

    async fn to_user(
        &self,
        session: &Session,
        message: MessageType,
        payload: Value,
    ) -> Result<(), SessionError> {
        self.gateway
            .send_to_user(&session.access_code, message, payload)
            .await?;
        Ok(())
    }

    async fn to_team(
        &self,
        session: &Session,
        message: MessageType,
        payload: Value,
    ) -> Result<(), SessionError> {
        self.gateway
            .send_to_team(session.team_id, message, payload)
            .await?;
        Ok(())
    }

    /// Add the participant to their team, creating the record if needed
    pub async fn join(&self, session: &Session) -> Result<TeamRecord, SessionError> {
        let result = self
            .store
            .ensure_participant(session.team_id, &session.access_code)
            .await;
        self.checked(session, result).await
    }

    /// Send the team record to the participant
    pub async fn send_test_state(&self, session: &Session) -> Result<(), SessionError> {
        let result = self.store.get(session.team_id).await;
        let record = self.checked(session, result).await?;
        let payload = serde_json::to_value(record)?;
        self.to_user(session, MessageType::GetTestStateRsp, payload)
            .await
    }

    /// Send the participant their own session
    pub async fn send_session_state(&self, session: &Session) -> Result<(), SessionError> {
        let payload = serde_json::to_value(session)?;
        self.to_user(session, MessageType::GetSessionStateRsp, payload)
            .await
    }

    pub async fn send_test_complete(&self, session: &Session) -> Result<(), SessionError> {
        self.to_team(session, MessageType::TestComplete, Value::Null)
            .await
    }

    /// Ask the team's lowest-ranked member to collect results
    pub async fn send_get_results_req(&self, session: &Session) -> Result<(), SessionError> {
        self.gateway
            .send_to_minimal_id(session.team_id, MessageType::GetResultsReq)
            .await?;
        Ok(())
    }

    pub async fn send_backend_ready(&self, session: &Session) -> Result<(), SessionError> {
        self.to_user(session, MessageType::BackendReady, Value::Null)
            .await
    }

    pub async fn send_is_backend_ready(
        &self,
        session: &Session,
        ready: bool,
    ) -> Result<(), SessionError> {
        self.to_user(session, MessageType::IsBackendReadyRsp, json!(ready))
            .await
    }

    /// Start a countdown of `duration` for the team
    pub async fn set_test_time(
        &self,
        session: &Session,
        duration: Duration,
    ) -> Result<bool, SessionError> {
        let result = self.store.start_countdown(session.team_id, duration).await;
        self.checked(session, result).await
    }

    /// Start the test's countdown and schedule its expiry
    ///
    /// Shortly after the limit passes the countdown is expired; if this call
    /// did the expiring, `on_expired` runs. The returned task resolves to
    /// whether it did.
    pub async fn setup_test_time<F>(
        &self,
        session: &Session,
        test: TestId,
        on_expired: F,
    ) -> Result<JoinHandle<bool>, SessionError>
    where
        F: FnOnce() + Send + 'static,
    {
        let limit = self.relational.test_time_limit(test).await?;
        tracing::debug!(team = %session.team_id, %test, ?limit, "starting countdown");
        self.set_test_time(session, limit).await?;

        let store = self.store.clone();
        let team = session.team_id;
        Ok(tokio::spawn(async move {
            tokio::time::sleep(limit + EXPIRY_GRACE).await;
            match store.expire_countdown(team).await {
                Ok(true) => {
                    on_expired();
                    true
                }
                Ok(false) => false,
                Err(e) => {
                    tracing::warn!(%team, error = %e, "failed to expire countdown");
                    false
                }
            }
        }))
    }

    /// Gate a privileged operation on the team's readiness
    ///
    /// A bypass grants the operation to this participant alone; reaching the
    /// quorum grants it to the whole team.
    pub async fn check_all_ready(
        &self,
        session: &Session,
        operation: Operation,
        test: TestId,
    ) -> Result<BarrierOutcome, SessionError> {
        let request = GateRequest {
            late: session.late,
            test,
            operation,
        };
        let result = self
            .barrier
            .enter(session.team_id, &session.access_code, request)
            .await;
        let outcome = self.checked(session, result).await?;

        let granted = serde_json::to_value(PermissionResponse::granted(operation))?;
        match outcome {
            BarrierOutcome::Bypassed => {
                self.to_user(session, MessageType::PermRsp, granted).await?
            }
            BarrierOutcome::Granted => {
                self.to_team(session, MessageType::PermRsp, granted).await?
            }
            BarrierOutcome::Pending => {}
        }
        Ok(outcome)
    }

    /// Try to take the title edit lock for this participant
    pub async fn check_edit_title(&self, session: &Session) -> Result<Decision, SessionError> {
        let result = self
            .store
            .claim_text_editing(session.team_id, &session.name)
            .await;
        let holder = self.checked(session, result).await?;

        if holder.as_deref() == Some(session.name.as_str()) {
            let response = PermissionResponse::granted(Operation::EditTitle);
            self.to_user(session, MessageType::PermRsp, serde_json::to_value(response)?)
                .await?;
            self.to_team(
                session,
                MessageType::TitleBeingEdited,
                json!({ "editingUser": session.name }),
            )
            .await?;
            Ok(Decision::Granted)
        } else {
            let response =
                PermissionResponse::declined(Operation::EditTitle, holder.unwrap_or_default());
            self.to_user(session, MessageType::PermRsp, serde_json::to_value(response)?)
                .await?;
            Ok(Decision::Declined)
        }
    }

    /// Broadcast the new title and release the edit lock
    pub async fn handle_update_title(
        &self,
        session: &Session,
        title: Value,
    ) -> Result<(), SessionError> {
        self.to_team(session, MessageType::UpdateTitle, title).await?;
        let result = self.store.clear_text_editing(session.team_id).await;
        self.checked(session, result).await?;
        Ok(())
    }

    pub async fn save_transaction(
        &self,
        session: &Session,
        test: TestId,
        data: Value,
    ) -> Result<(), SessionError> {
        self.relational
            .save_transaction(session.team_id, session.user_id, test, data)
            .await?;
        Ok(())
    }

    /// Send a participant action to the team, tagged with its author
    pub async fn broadcast_transaction(
        &self,
        session: &Session,
        message: MessageType,
        mut data: Value,
    ) -> Result<(), SessionError> {
        if let Value::Object(fields) = &mut data {
            fields.insert("userID".to_string(), json!(session.user_id));
        }
        self.to_team(session, message, data).await
    }

    pub async fn save_and_broadcast(
        &self,
        session: &Session,
        message: MessageType,
        test: TestId,
        data: Value,
    ) -> Result<(), SessionError> {
        self.save_transaction(session, test, data.clone()).await?;
        self.broadcast_transaction(session, message, data).await
    }

    /// Broadcast a shared-object manipulation using the catalog's message map
    pub async fn broadcast_operation(
        &self,
        session: &Session,
        object: ObjectKind,
        operation: OperationKind,
        data: Value,
    ) -> Result<bool, SessionError> {
        let Some(message) = self.store.catalog().message(object, operation) else {
            tracing::debug!(?object, ?operation, "no message for operation");
            return Ok(false);
        };
        self.broadcast_transaction(session, message, data).await?;
        Ok(true)
    }

    /// Replay the actions recorded on the team's current screen, then EndData
    pub async fn send_transactions(
        &self,
        session: &Session,
        test: TestId,
    ) -> Result<usize, SessionError> {
        let result = self.store.current_screen(session.team_id).await;
        let screen = self.checked(session, result).await?;
        let rows = self
            .relational
            .transactions(session.team_id, test, screen)
            .await?;

        for row in &rows {
            let payload = json!({
                "owner": AccessCode::new(row.team_id, row.user_id).to_string(),
                "colour": self.store.catalog().user_colour(row.user_id),
                "screen": row.screen,
                "data": row.data,
            });
            self.to_user(session, MessageType::Transaction, payload)
                .await?;
        }
        self.send_end_data(session).await?;
        Ok(rows.len())
    }

    pub async fn send_end_data(&self, session: &Session) -> Result<(), SessionError> {
        self.to_user(session, MessageType::EndData, Value::Null)
            .await
    }

    /// Tear down a participant's presence in the team
    pub async fn disconnect_user(&self, session: &Session) -> Result<(), SessionError> {
        tracing::debug!(code = %session.access_code, "participant disconnected");
        self.relational
            .deactivate_user(session.team_id, session.user_id)
            .await?;
        let result = self
            .store
            .remove_participant(session.team_id, &session.access_code)
            .await;
        self.checked(session, result).await?;

        // The client may already be gone
        if let Err(e) = self
            .gateway
            .leave_team(&session.access_code, session.team_id)
            .await
        {
            tracing::debug!(error = %e, "leave after disconnect failed");
        }
        if let Err(e) = self.gateway.disconnect(&session.access_code).await {
            tracing::debug!(error = %e, "disconnect failed");
        }

        let active = self.relational.active_users_count().await?;
        tracing::info!(active, "active users");
        Ok(())
    }

    /// Send the instructions of the team's current test
    pub async fn send_instruction_file(&self, session: &Session) -> Result<(), SessionError> {
        let result = self.store.current_test(session.team_id).await;
        let test = self.checked(session, result).await?;
        let path = self.relational.test_instruction_file(test).await?;
        self.send_file(session, MessageType::GetTestInstructionRsp, path)
            .await
    }

    pub async fn send_introduction(&self, session: &Session) -> Result<(), SessionError> {
        let path = self.relational.introduction_file().await?;
        self.send_file(session, MessageType::GetIntroductionRsp, path)
            .await
    }

    async fn send_file(
        &self,
        session: &Session,
        message: MessageType,
        path: PathBuf,
    ) -> Result<(), SessionError> {
        let contents = tokio::fs::read_to_string(&path)
            .await
            .map_err(|source| SessionError::File {
                path: path.clone(),
                source,
            })?;
        self.to_user(session, message, Value::String(contents))
            .await
    }

    /// Send the whole team to a test's instruction page
    pub async fn redirect_to_test(
        &self,
        session: &Session,
        test: TestId,
    ) -> Result<(), SessionError> {
        let url = self
            .store
            .catalog()
            .instruction_url(test)
            .ok_or(SessionError::UnknownTest(test))?
            .to_string();
        self.to_team(session, MessageType::Goto, Value::String(url))
            .await
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;

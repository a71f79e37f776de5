// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Lock-guarded access to team records
//!
//! Every mutation is a read-modify-write of the whole record performed while
//! holding the team's lock. A transformation that leaves the record unchanged
//! writes nothing.

use crate::backend::{RecordBackend, StoreError};
use crate::lock::{LockGuard, LockManager};
use std::sync::Arc;
use std::time::Duration;
use ts_adapters::AssetStore;
use ts_core::{
    AccessCode, Catalog, Clock, Event, SyncConfig, SystemClock, TeamId, TeamRecord, TestId,
    INSTRUCTION_SCREEN,
};

const KEY_PREFIX: &str = "team:";

/// Backend key of a team's record (also the name of its lock)
pub fn team_key(team: TeamId) -> String {
    format!("{KEY_PREFIX}{team}")
}

/// What to do with the record after a locked transformation
enum Write {
    Keep,
    Save(TeamRecord),
    Delete,
}

/// Atomic operations on per-team records
#[derive(Clone)]
pub struct TeamRecordStore<B, A, C = SystemClock> {
    locks: LockManager<B>,
    assets: A,
    catalog: Arc<Catalog>,
    config: Arc<SyncConfig>,
    clock: C,
}

impl<B: RecordBackend, A: AssetStore> TeamRecordStore<B, A, SystemClock> {
    pub fn new(backend: B, assets: A, catalog: Arc<Catalog>, config: SyncConfig) -> Self {
        Self::with_clock(backend, assets, catalog, config, SystemClock)
    }
}

impl<B: RecordBackend, A: AssetStore, C: Clock> TeamRecordStore<B, A, C> {
    pub fn with_clock(
        backend: B,
        assets: A,
        catalog: Arc<Catalog>,
        config: SyncConfig,
        clock: C,
    ) -> Self {
        Self {
            locks: LockManager::from_config(backend, &config),
            assets,
            catalog,
            config: Arc::new(config),
            clock,
        }
    }

    pub fn backend(&self) -> &B {
        self.locks.backend()
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    async fn load(&self, key: &str) -> Result<Option<TeamRecord>, StoreError> {
        let Some(fields) = self.backend().load(key).await? else {
            return Ok(None);
        };
        TeamRecord::from_fields(&fields)
            .map(Some)
            .map_err(|source| StoreError::Record {
                key: key.to_string(),
                source,
            })
    }

    /// Run `f` on the current record while holding the team's lock
    ///
    /// A change is only written while the lock is still ours; if it expired
    /// while `f` ran the write is dropped with [`StoreError::LockLost`].
    async fn locked<T, F>(&self, team: TeamId, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(Option<TeamRecord>) -> (Write, T) + Send,
        T: Send,
    {
        let key = team_key(team);
        let guard = self.locks.acquire(&key).await?;
        let result = self.read_modify_write(&guard, f).await;
        if let Err(e) = guard.release().await {
            tracing::warn!(key = %key, error = %e, "failed to release team lock");
        }
        result
    }

    async fn read_modify_write<T, F>(&self, guard: &LockGuard<B>, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(Option<TeamRecord>) -> (Write, T) + Send,
        T: Send,
    {
        let key = guard.key();
        let current = self.load(key).await?;
        let (write, out) = f(current);
        if matches!(write, Write::Keep) {
            return Ok(out);
        }
        if !guard.refresh().await? {
            tracing::warn!(key, holder = %guard.holder(), "lock expired, write dropped");
            return Err(StoreError::LockLost {
                key: key.to_string(),
            });
        }
        match write {
            Write::Keep => {}
            Write::Save(record) => self.backend().save(key, record.to_fields()).await?,
            Write::Delete => {
                self.backend().remove(key).await?;
            }
        }
        Ok(out)
    }

    async fn remove_asset(&self, team: TeamId, name: &str) {
        match self.assets.remove(name).await {
            Ok(()) => tracing::debug!(%team, asset = name, "background image removed"),
            Err(e) => {
                tracing::warn!(%team, asset = name, error = %e, "failed to remove background image")
            }
        }
    }

    /// Snapshot of a team's record
    pub async fn get(&self, team: TeamId) -> Result<Option<TeamRecord>, StoreError> {
        self.load(&team_key(team)).await
    }

    /// Ids of all teams that currently have a record
    pub async fn teams(&self) -> Result<Vec<TeamId>, StoreError> {
        let mut teams: Vec<TeamId> = self
            .backend()
            .keys()
            .await?
            .iter()
            .filter_map(|key| key.strip_prefix(KEY_PREFIX)?.parse().ok())
            .collect();
        teams.sort();
        Ok(teams)
    }

    /// Apply `f` to the record under lock and return its result
    ///
    /// Returns `None` without calling `f` if the team has no record.
    pub async fn update_with<T, F>(&self, team: TeamId, f: F) -> Result<Option<T>, StoreError>
    where
        F: FnOnce(&mut TeamRecord) -> T + Send,
        T: Send,
    {
        self.locked(team, |current| match current {
            None => (Write::Keep, None),
            Some(before) => {
                let mut record = before.clone();
                let out = f(&mut record);
                let write = if record == before {
                    Write::Keep
                } else {
                    Write::Save(record)
                };
                (write, Some(out))
            }
        })
        .await
    }

    /// Apply `f` to the record under lock and return the updated record
    pub async fn update<F>(&self, team: TeamId, f: F) -> Result<Option<TeamRecord>, StoreError>
    where
        F: FnOnce(&mut TeamRecord) + Send,
    {
        self.update_with(team, |record| {
            f(record);
            record.clone()
        })
        .await
    }

    /// Add `code` to the team, creating the record on first join
    pub async fn ensure_participant(
        &self,
        team: TeamId,
        code: &AccessCode,
    ) -> Result<TeamRecord, StoreError> {
        let code = code.clone();
        let order = self
            .config
            .test_order
            .order_for(team, self.catalog.canonical_order());
        let demo_stop_timer = self.config.demo_stop_timer;

        let (record, events) = self
            .locked(team, move |current| {
                let mut events = Vec::new();
                let mut record = match current {
                    Some(record) => record,
                    None => {
                        tracing::debug!(%team, ?order, "creating team record");
                        events.push(Event::TeamCreated { team: team.get() });
                        TeamRecord::new(order, demo_stop_timer)
                    }
                };
                if record.join(code.clone()) {
                    events.push(Event::ParticipantJoined {
                        team: team.get(),
                        code: code.to_string(),
                    });
                }
                let write = if events.is_empty() {
                    Write::Keep
                } else {
                    Write::Save(record.clone())
                };
                (write, (record, events))
            })
            .await?;

        for event in &events {
            event.log();
        }
        Ok(record)
    }

    /// Remove `code` from Participants and ReadyToStart
    pub async fn remove_participant(
        &self,
        team: TeamId,
        code: &AccessCode,
    ) -> Result<bool, StoreError> {
        let code = code.clone();
        let left = self
            .update_with(team, |record| record.leave(&code))
            .await?
            .unwrap_or(false);
        if left {
            Event::ParticipantLeft {
                team: team.get(),
                code: code.to_string(),
            }
            .log();
        }
        Ok(left)
    }

    pub async fn clear_participants(&self, team: TeamId) -> Result<bool, StoreError> {
        let updated = self
            .update(team, |record| {
                record.participants.clear();
                record.ready_to_start.clear();
            })
            .await?;
        Ok(updated.is_some())
    }

    pub async fn participants(&self, team: TeamId) -> Result<Vec<AccessCode>, StoreError> {
        Ok(self
            .get(team)
            .await?
            .map(|record| record.participants.iter().cloned().collect())
            .unwrap_or_default())
    }

    /// Mark `code` ready, adding it to Participants if missing
    pub async fn add_ready(&self, team: TeamId, code: &AccessCode) -> Result<bool, StoreError> {
        let code = code.clone();
        Ok(self
            .update(team, move |record| record.mark_ready(code))
            .await?
            .is_some())
    }

    pub async fn remove_ready(&self, team: TeamId, code: &AccessCode) -> Result<bool, StoreError> {
        let code = code.clone();
        Ok(self
            .update_with(team, move |record| record.ready_to_start.remove(&code))
            .await?
            .unwrap_or(false))
    }

    pub async fn clear_ready(&self, team: TeamId) -> Result<bool, StoreError> {
        Ok(self
            .update(team, |record| record.ready_to_start.clear())
            .await?
            .is_some())
    }

    /// Try to take the title edit lock; returns the holder afterwards
    pub async fn claim_text_editing(
        &self,
        team: TeamId,
        name: &str,
    ) -> Result<Option<String>, StoreError> {
        let name = name.to_string();
        self.update_with(team, move |record| {
            record.claim_text_editing(&name).to_string()
        })
        .await
    }

    pub async fn clear_text_editing(&self, team: TeamId) -> Result<bool, StoreError> {
        Ok(self
            .update(team, |record| record.text_editing_user = None)
            .await?
            .is_some())
    }

    pub async fn text_editing_user(&self, team: TeamId) -> Result<Option<String>, StoreError> {
        Ok(self
            .get(team)
            .await?
            .and_then(|record| record.text_editing_user))
    }

    /// Hand out the current IdeaId and advance it
    ///
    /// `None` if the team has no record or its counter is exhausted.
    pub async fn increment_idea_id(&self, team: TeamId) -> Result<Option<u64>, StoreError> {
        Ok(self
            .update_with(team, TeamRecord::next_idea_id)
            .await?
            .flatten())
    }

    pub async fn set_idea_id(&self, team: TeamId, id: u64) -> Result<bool, StoreError> {
        Ok(self
            .update(team, move |record| record.idea_id = id)
            .await?
            .is_some())
    }

    pub async fn idea_id(&self, team: TeamId) -> Result<Option<u64>, StoreError> {
        Ok(self.get(team).await?.map(|record| record.idea_id))
    }

    pub async fn set_current_test(&self, team: TeamId, test: TestId) -> Result<bool, StoreError> {
        Ok(self
            .update(team, move |record| record.current_test = test)
            .await?
            .is_some())
    }

    /// Active test; the practice area when the team has no record
    pub async fn current_test(&self, team: TeamId) -> Result<TestId, StoreError> {
        Ok(self
            .get(team)
            .await?
            .map_or(TestId::PracArea, |record| record.current_test))
    }

    pub async fn set_current_screen(&self, team: TeamId, screen: u32) -> Result<bool, StoreError> {
        Ok(self
            .update(team, move |record| record.current_screen = screen)
            .await?
            .is_some())
    }

    /// Current screen; the instruction screen when the team has no record
    pub async fn current_screen(&self, team: TeamId) -> Result<u32, StoreError> {
        Ok(self
            .get(team)
            .await?
            .map_or(INSTRUCTION_SCREEN, |record| record.current_screen))
    }

    /// Start a countdown of `duration` from now
    pub async fn start_countdown(&self, team: TeamId, duration: Duration) -> Result<bool, StoreError> {
        let now = self.clock.epoch_ms();
        let length = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX);
        Ok(self
            .update(team, move |record| record.start_countdown(now, length))
            .await?
            .is_some())
    }

    /// Clear the countdown if it has run out; true if one was cleared
    pub async fn expire_countdown(&self, team: TeamId) -> Result<bool, StoreError> {
        let now = self.clock.epoch_ms();
        let expired = self
            .update_with(team, move |record| record.expire_countdown(now))
            .await?
            .unwrap_or(false);
        if expired {
            tracing::info!(%team, "countdown expired");
        }
        Ok(expired)
    }

    /// Claim background authorship; returns the creator afterwards
    pub async fn claim_background_creator(
        &self,
        team: TeamId,
        code: &AccessCode,
    ) -> Result<Option<AccessCode>, StoreError> {
        let code = code.clone();
        self.update_with(team, move |record| {
            record.claim_background_creator(code).clone()
        })
        .await
    }

    pub async fn set_background_image(&self, team: TeamId, name: &str) -> Result<bool, StoreError> {
        let name = name.to_string();
        let updated = self
            .update(team, move |record| record.pic_con_bg_image = Some(name))
            .await?;
        Ok(updated.is_some())
    }

    pub async fn demo_stop_timer(&self, team: TeamId) -> Result<Option<bool>, StoreError> {
        Ok(self.get(team).await?.map(|record| record.demo_stop_timer))
    }

    pub async fn set_demo_stop_timer(&self, team: TeamId, enabled: bool) -> Result<bool, StoreError> {
        Ok(self
            .update(team, move |record| record.demo_stop_timer = enabled)
            .await?
            .is_some())
    }

    pub async fn tests_order(&self, team: TeamId) -> Result<Option<Vec<TestId>>, StoreError> {
        Ok(self.get(team).await?.map(|record| record.tests_order))
    }

    /// Return the record to defaults, keeping TestsOrder, and drop its asset
    pub async fn reset(&self, team: TeamId) -> Result<bool, StoreError> {
        let demo_stop_timer = self.config.demo_stop_timer;
        let image = self
            .locked(team, move |current| match current {
                None => (Write::Keep, None),
                Some(mut record) => {
                    let image = record.pic_con_bg_image.take();
                    record.reset(demo_stop_timer);
                    (Write::Save(record), Some(image))
                }
            })
            .await?;

        let Some(image) = image else {
            return Ok(false);
        };
        Event::TeamReset { team: team.get() }.log();
        if let Some(image) = image {
            self.remove_asset(team, &image).await;
        }
        Ok(true)
    }

    /// Remove the record and its asset
    pub async fn delete(&self, team: TeamId) -> Result<bool, StoreError> {
        let image = self
            .locked(team, |current| match current {
                None => (Write::Keep, None),
                Some(record) => (Write::Delete, Some(record.pic_con_bg_image)),
            })
            .await?;

        let Some(image) = image else {
            return Ok(false);
        };
        Event::TeamDeleted { team: team.get() }.log();
        if let Some(image) = image {
            self.remove_asset(team, &image).await;
        }
        Ok(true)
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;

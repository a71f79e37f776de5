// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Synchronization layer configuration
//!
//! Loaded once from TOML at startup. Every key is optional; durations use
//! humantime syntax (`"50ms"`, `"10s"`, `"5m"`).

use crate::permutation::generate_test_order;
use crate::record::TeamId;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("io error reading {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Top-level configuration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Lease lifetime for a team lock
    #[serde(with = "humantime_serde")]
    pub lock_ttl: Duration,
    /// Delay between lock acquisition attempts
    #[serde(with = "humantime_serde")]
    pub lock_retry_interval: Duration,
    /// Give up acquiring a lock after this long
    #[serde(with = "humantime_serde")]
    pub lock_acquire_timeout: Duration,
    pub wait: WaitPolicy,
    pub test_order: TestOrderPolicy,
    /// Directory holding uploaded background images
    pub background_image_dir: PathBuf,
    /// DemoStopTimer value for new and reset records
    pub demo_stop_timer: bool,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            lock_ttl: Duration::from_secs(5),
            lock_retry_interval: Duration::from_millis(50),
            lock_acquire_timeout: Duration::from_secs(10),
            wait: WaitPolicy::default(),
            test_order: TestOrderPolicy::default(),
            background_image_dir: PathBuf::from("bgimages"),
            demo_stop_timer: true,
        }
    }
}

impl SyncConfig {
    /// Parse from a TOML string
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(raw)?)
    }

    /// Load from a file; a missing file yields the defaults
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(raw) => Self::from_toml_str(&raw),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                Ok(Self::default())
            }
            Err(source) => Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            }),
        }
    }
}

/// Bounds for condition waits
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaitPolicy {
    /// Delay between predicate checks
    #[serde(with = "humantime_serde")]
    pub poll_interval: Duration,
    /// Stop waiting after this long
    #[serde(with = "humantime_serde")]
    pub deadline: Option<Duration>,
    /// Stop waiting after this many checks
    pub max_attempts: Option<u32>,
}

impl Default for WaitPolicy {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(1000),
            deadline: Some(Duration::from_secs(600)),
            max_attempts: None,
        }
    }
}

impl WaitPolicy {
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_deadline(mut self, deadline: Option<Duration>) -> Self {
        self.deadline = deadline;
        self
    }

    pub fn with_max_attempts(mut self, attempts: Option<u32>) -> Self {
        self.max_attempts = attempts;
        self
    }
}

/// Whether and from which team on test orders are permuted
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TestOrderPolicy {
    pub randomized: bool,
    /// Teams below this id keep the canonical order
    pub start_id: u64,
}

impl Default for TestOrderPolicy {
    fn default() -> Self {
        Self {
            randomized: true,
            start_id: 0,
        }
    }
}

impl TestOrderPolicy {
    /// Order for a team given the canonical order
    pub fn order_for<T: Clone>(&self, team: TeamId, canonical: &[T]) -> Vec<T> {
        if self.randomized && team.get() >= self.start_id {
            generate_test_order(team, canonical)
        } else {
            canonical.to_vec()
        }
    }
}

#[cfg(test)]
#[path = "sync_tests.rs"]
mod tests;

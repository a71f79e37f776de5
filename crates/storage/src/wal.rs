// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Durable record log
//!
//! Records are persisted as JSON lines of [`RecordOp`]s. A log is owned by
//! one process at a time: opening it takes an exclusive lock on a sibling
//! `.lock` file, held until the [`Wal`] is dropped. On open the log is
//! replayed and, when it holds superseded entries, rewritten to a single
//! `Put` per live record.

use crate::operation::RecordOp;
use crate::state::MaterializedRecords;
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WalError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("record log {path} is in use by another process: {source}")]
    Locked {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, Serialize, Deserialize)]
struct Entry {
    seq: u64,
    op: RecordOp,
}

/// Exclusively owned, append-only record log
#[derive(Debug)]
pub struct Wal {
    file: File,
    sequence: u64,
    // Dropping the handle releases the lock
    _lock: File,
}

/// A log opened for writing plus the records it held
#[derive(Debug)]
pub struct OpenedLog {
    pub wal: Wal,
    pub records: MaterializedRecords,
    /// Entries dropped by compaction
    pub compacted: usize,
}

fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
}

impl Wal {
    /// Lock, replay and compact the log at `path`
    ///
    /// Fails with [`WalError::Locked`] while another handle owns the log.
    pub fn open(path: &Path) -> Result<OpenedLog, WalError> {
        let lock_path = sibling(path, ".lock");
        let lock = File::create(&lock_path)?;
        lock.try_lock_exclusive().map_err(|source| WalError::Locked {
            path: path.to_path_buf(),
            source,
        })?;

        let ops = Self::replay(path)?;
        let records = MaterializedRecords::from_ops(&ops);
        let compacted = ops.len().saturating_sub(records.len());
        if compacted > 0 {
            Self::rewrite(path, &records)?;
        }

        let file = OpenOptions::new().create(true).append(true).open(path)?;
        let sequence = (ops.len() - compacted) as u64;
        Ok(OpenedLog {
            wal: Self {
                file,
                sequence,
                _lock: lock,
            },
            records,
            compacted,
        })
    }

    /// Replace the log with one `Put` per record, atomically
    fn rewrite(path: &Path, records: &MaterializedRecords) -> Result<(), WalError> {
        let tmp = sibling(path, ".compact");
        {
            let mut out = BufWriter::new(File::create(&tmp)?);
            for (seq, op) in records.to_ops().into_iter().enumerate() {
                let entry = Entry {
                    seq: seq as u64 + 1,
                    op,
                };
                serde_json::to_writer(&mut out, &entry)?;
                out.write_all(b"\n")?;
            }
            out.into_inner().map_err(io::IntoInnerError::into_error)?.sync_all()?;
        }
        fs::rename(&tmp, path)?;
        Ok(())
    }

    /// Append `op` and fsync; returns its sequence number
    pub fn append(&mut self, op: &RecordOp) -> Result<u64, WalError> {
        let seq = self.sequence + 1;
        let mut line = serde_json::to_vec(&Entry {
            seq,
            op: op.clone(),
        })?;
        line.push(b'\n');
        self.file.write_all(&line)?;
        self.file.sync_all()?;
        self.sequence = seq;
        Ok(seq)
    }

    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Every operation in the log, oldest first; empty if there is no log
    pub fn replay(path: &Path) -> Result<Vec<RecordOp>, WalError> {
        let file = match File::open(path) {
            Ok(f) => f,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut ops = Vec::new();
        for line in BufReader::new(file).lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            ops.push(serde_json::from_str::<Entry>(&line)?.op);
        }
        Ok(ops)
    }
}

#[cfg(test)]
#[path = "wal_tests.rs"]
mod tests;

//! Checkpoint tracking for index updaters.
//!
//! A checkpoint records the last outbox sequence an updater has applied
//! and committed, so a restarted process resumes where it stopped.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::IndexingError;

/// Persisted progress of one updater.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexCheckpoint {
    /// Name of the updater this checkpoint belongs to
    pub updater: String,

    /// Last outbox sequence applied and committed; None before the first
    pub last_sequence: Option<u64>,

    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub last_processed_time: DateTime<Utc>,

    /// Total entries applied since checkpoint creation
    pub processed_count: u64,

    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
}

impl IndexCheckpoint {
    pub fn new(updater: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            updater: updater.into(),
            last_sequence: None,
            last_processed_time: now,
            processed_count: 0,
            created_at: now,
        }
    }

    /// Storage key for an updater's checkpoint.
    pub fn key_for(updater: &str) -> String {
        format!("index_{}", updater)
    }

    pub fn checkpoint_key(&self) -> String {
        Self::key_for(&self.updater)
    }

    /// First outbox sequence not yet applied.
    pub fn next_sequence(&self) -> u64 {
        self.last_sequence.map_or(0, |seq| seq + 1)
    }

    /// Whether the entry at `sequence` still needs applying.
    pub fn is_pending(&self, sequence: u64) -> bool {
        self.last_sequence.is_none_or(|last| sequence > last)
    }

    /// Update checkpoint after processing entries
    pub fn update(&mut self, new_sequence: u64, items_processed: u64) {
        self.last_sequence = Some(new_sequence);
        self.last_processed_time = Utc::now();
        self.processed_count += items_processed;
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, IndexingError> {
        serde_json::to_vec(self).map_err(IndexingError::from)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, IndexingError> {
        serde_json::from_slice(bytes).map_err(IndexingError::from)
    }
}

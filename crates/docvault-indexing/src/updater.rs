//! Index updater trait for incremental index updates.
//!
//! Each index kept in step with storage implements this trait; the
//! pipeline feeds it outbox entries in sequence order.

use crate::error::IndexingError;

/// Trait for index-specific update operations.
pub trait IndexUpdater: Send + Sync {
    /// Bring the entry of a document up to date with storage.
    ///
    /// Returns false when there was nothing to index (the document no
    /// longer exists, in which case any stale entry is removed).
    fn index_document(&self, document_id: &str) -> Result<bool, IndexingError>;

    /// Remove a document's entry.
    fn remove_document(&self, document_id: &str) -> Result<(), IndexingError>;

    /// Commit pending changes to make them visible.
    fn commit(&self) -> Result<(), IndexingError>;

    /// Discard changes not yet committed.
    fn rollback(&self) -> Result<(), IndexingError>;

    /// Name of this updater, used for logging and its checkpoint key.
    fn name(&self) -> &str;
}

/// Result of processing a batch of outbox entries.
#[derive(Debug, Default, Clone)]
pub struct UpdateResult {
    /// Number of entries successfully processed
    pub processed: usize,
    /// Number of entries that needed no index change
    pub skipped: usize,
    /// The highest sequence number processed
    pub last_sequence: Option<u64>,
}

impl UpdateResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_success(&mut self) {
        self.processed += 1;
    }

    pub fn record_skip(&mut self) {
        self.skipped += 1;
    }

    pub fn set_sequence(&mut self, seq: u64) {
        self.last_sequence = Some(seq);
    }

    /// Merge another result into this one.
    pub fn merge(&mut self, other: &UpdateResult) {
        self.processed += other.processed;
        self.skipped += other.skipped;
        self.last_sequence = self.last_sequence.max(other.last_sequence);
    }
}

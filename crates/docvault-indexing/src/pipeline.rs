//! Indexing pipeline for processing outbox entries.
//!
//! Coordinates index updaters, manages checkpoints, and trims the outbox
//! once every updater has committed past an entry.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, info, warn};

use docvault_storage::Storage;
use docvault_types::OutboxAction;

use crate::checkpoint::IndexCheckpoint;
use crate::error::IndexingError;
use crate::updater::{IndexUpdater, UpdateResult};

/// Result of processing outbox entries.
#[derive(Debug, Default)]
pub struct ProcessResult {
    /// Results per updater name
    pub by_updater: HashMap<String, UpdateResult>,
    /// Total entries processed across all updaters
    pub total_processed: usize,
    /// The last sequence number handled
    pub last_sequence: Option<u64>,
    /// Whether the updaters were committed
    pub committed: bool,
}

impl ProcessResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_result(&mut self, updater: &str, result: UpdateResult) {
        self.total_processed += result.processed;
        self.last_sequence = self.last_sequence.max(result.last_sequence);
        self.by_updater
            .entry(updater.to_string())
            .or_default()
            .merge(&result);
    }

    /// Whether any outbox entry was handled.
    pub fn has_entries(&self) -> bool {
        self.last_sequence.is_some()
    }
}

/// Configuration for the indexing pipeline.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Maximum entries to process per batch
    pub batch_size: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            batch_size: 100,
        }
    }
}

impl PipelineConfig {
    pub fn with_batch_size(mut self, size: usize) -> Self {
        self.batch_size = size;
        self
    }
}

/// Indexing pipeline that coordinates index updaters.
///
/// Processes outbox entries in sequence order and updates all registered
/// indexes with checkpoint tracking.
pub struct IndexingPipeline {
    storage: Arc<Storage>,
    updaters: Vec<Box<dyn IndexUpdater>>,
    checkpoints: HashMap<String, IndexCheckpoint>,
    config: PipelineConfig,
}

impl IndexingPipeline {
    pub fn new(storage: Arc<Storage>, config: PipelineConfig) -> Self {
        Self {
            storage,
            updaters: Vec::new(),
            checkpoints: HashMap::new(),
            config,
        }
    }

    /// Add an index updater to the pipeline.
    pub fn add_updater(&mut self, updater: Box<dyn IndexUpdater>) {
        let name = updater.name().to_string();
        self.updaters.push(updater);
        self.checkpoints
            .entry(name.clone())
            .or_insert_with(|| IndexCheckpoint::new(name));
    }

    /// Load checkpoints from storage.
    pub fn load_checkpoints(&mut self) -> Result<(), IndexingError> {
        for updater in &self.updaters {
            let name = updater.name();
            let checkpoint = match self.storage.get_checkpoint(&IndexCheckpoint::key_for(name))? {
                Some(bytes) => {
                    let checkpoint = IndexCheckpoint::from_bytes(&bytes)?;
                    info!(
                        index = %name,
                        last_sequence = ?checkpoint.last_sequence,
                        "Loaded checkpoint"
                    );
                    checkpoint
                }
                None => {
                    debug!(index = %name, "No existing checkpoint, starting from 0");
                    IndexCheckpoint::new(name)
                }
            };
            self.checkpoints.insert(name.to_string(), checkpoint);
        }
        Ok(())
    }

    /// Save checkpoints to storage.
    pub fn save_checkpoints(&self) -> Result<(), IndexingError> {
        for checkpoint in self.checkpoints.values() {
            let bytes = checkpoint.to_bytes()?;
            self.storage
                .put_checkpoint(&checkpoint.checkpoint_key(), &bytes)?;
            debug!(
                index = %checkpoint.updater,
                last_sequence = ?checkpoint.last_sequence,
                "Saved checkpoint"
            );
        }
        Ok(())
    }

    /// Lowest sequence some updater has not applied yet.
    fn min_next_sequence(&self) -> u64 {
        self.checkpoints
            .values()
            .map(IndexCheckpoint::next_sequence)
            .min()
            .unwrap_or(0)
    }

    /// Process one batch of outbox entries, commit, and checkpoint.
    pub fn process_batch(&mut self, batch_size: usize) -> Result<ProcessResult, IndexingError> {
        let start_sequence = self.min_next_sequence();
        let entries = self
            .storage
            .get_outbox_entries(start_sequence, batch_size.max(1))?;

        if entries.is_empty() {
            debug!(start_sequence, "No outbox entries to process");
            return Ok(ProcessResult::new());
        }

        debug!(count = entries.len(), start_sequence, "Processing outbox entries");

        let mut result = ProcessResult::new();
        for updater in &self.updaters {
            let name = updater.name();
            let Some(checkpoint) = self.checkpoints.get(name) else {
                continue;
            };

            let mut update_result = UpdateResult::new();
            for (sequence, entry) in entries.iter().filter(|(seq, _)| checkpoint.is_pending(*seq)) {
                let outcome = match entry.action {
                    OutboxAction::IndexDocument => updater.index_document(&entry.document_id),
                    OutboxAction::RemoveDocument => {
                        updater.remove_document(&entry.document_id).map(|_| true)
                    }
                };
                match outcome {
                    Ok(true) => update_result.record_success(),
                    Ok(false) => update_result.record_skip(),
                    Err(e) => {
                        warn!(
                            index = %name,
                            sequence,
                            doc_id = %entry.document_id,
                            error = %e,
                            "Failed to apply outbox entry"
                        );
                        self.rollback();
                        return Err(e);
                    }
                }
                update_result.set_sequence(*sequence);
            }

            result.add_result(name, update_result);
        }

        if result.has_entries() {
            self.commit()?;
            result.committed = true;

            for (name, checkpoint) in self.checkpoints.iter_mut() {
                if let Some(update) = result.by_updater.get(name) {
                    if let Some(last) = update.last_sequence {
                        checkpoint.update(last, update.processed as u64);
                    }
                }
            }
            self.save_checkpoints()?;

            debug!(
                last_sequence = ?result.last_sequence,
                total_processed = result.total_processed,
                "Batch processing complete"
            );
        }

        Ok(result)
    }

    /// Commit all indexes.
    pub fn commit(&self) -> Result<(), IndexingError> {
        for updater in &self.updaters {
            updater.commit()?;
        }
        Ok(())
    }

    /// Discard uncommitted changes of every updater.
    fn rollback(&self) {
        for updater in &self.updaters {
            if let Err(e) = updater.rollback() {
                warn!(index = %updater.name(), error = %e, "Rollback failed");
            }
        }
    }

    /// Process entries until caught up or max iterations reached.
    pub fn process_until_caught_up(
        &mut self,
        max_iterations: usize,
    ) -> Result<ProcessResult, IndexingError> {
        let mut total_result = ProcessResult::new();

        for _ in 0..max_iterations {
            let batch_result = self.process_batch(self.config.batch_size)?;
            if !batch_result.has_entries() {
                break;
            }

            total_result.committed |= batch_result.committed;
            for (name, result) in batch_result.by_updater {
                total_result.add_result(&name, result);
            }
        }

        Ok(total_result)
    }

    /// Delete outbox entries every updater has committed past.
    pub fn cleanup_outbox(&self) -> Result<usize, IndexingError> {
        let next = self.min_next_sequence();
        if next == 0 {
            return Ok(0);
        }

        let deleted = self.storage.delete_outbox_entries(next - 1)?;
        if deleted > 0 {
            debug!(up_to = next - 1, deleted, "Cleaned up outbox entries");
        }
        Ok(deleted)
    }

    pub fn get_checkpoint(&self, updater: &str) -> Option<&IndexCheckpoint> {
        self.checkpoints.get(updater)
    }

    pub fn updater_names(&self) -> Vec<&str> {
        self.updaters.iter().map(|u| u.name()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use docvault_types::Document;
    use tempfile::TempDir;

    /// Records the calls it receives.
    #[derive(Default)]
    struct RecordingUpdater {
        calls: Arc<Mutex<Vec<String>>>,
        fail_on: Option<&'static str>,
    }

    impl IndexUpdater for RecordingUpdater {
        fn index_document(&self, document_id: &str) -> Result<bool, IndexingError> {
            if self.fail_on == Some(document_id) {
                return Err(IndexingError::Checkpoint("mock failure".to_string()));
            }
            self.calls
                .lock()
                .unwrap()
                .push(format!("index:{}", document_id));
            Ok(true)
        }

        fn remove_document(&self, document_id: &str) -> Result<(), IndexingError> {
            self.calls
                .lock()
                .unwrap()
                .push(format!("remove:{}", document_id));
            Ok(())
        }

        fn commit(&self) -> Result<(), IndexingError> {
            self.calls.lock().unwrap().push("commit".to_string());
            Ok(())
        }

        fn rollback(&self) -> Result<(), IndexingError> {
            self.calls.lock().unwrap().push("rollback".to_string());
            Ok(())
        }

        fn name(&self) -> &str {
            "recording"
        }
    }

    fn create_test_storage() -> (Arc<Storage>, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let storage = Storage::open(temp_dir.path()).unwrap();
        (Arc::new(storage), temp_dir)
    }

    fn pipeline_with(
        storage: Arc<Storage>,
        updater: RecordingUpdater,
    ) -> IndexingPipeline {
        let mut pipeline = IndexingPipeline::new(storage, PipelineConfig::default());
        pipeline.add_updater(Box::new(updater));
        pipeline.load_checkpoints().unwrap();
        pipeline
    }

    #[test]
    fn test_process_batch_empty() {
        let (storage, _temp) = create_test_storage();
        let mut pipeline = pipeline_with(storage, RecordingUpdater::default());

        let result = pipeline.process_batch(100).unwrap();
        assert!(!result.has_entries());
        assert!(!result.committed);
        assert_eq!(pipeline.updater_names(), vec!["recording"]);
    }

    #[test]
    fn test_entries_applied_in_order_then_committed() {
        let (storage, _temp) = create_test_storage();
        storage
            .put_document(&Document::with_id("doc-1", "alice", "One"))
            .unwrap();
        storage
            .put_document(&Document::with_id("doc-2", "alice", "Two"))
            .unwrap();
        storage.delete_document("doc-1").unwrap();

        let updater = RecordingUpdater::default();
        let calls = updater.calls.clone();
        let mut pipeline = pipeline_with(storage.clone(), updater);

        let result = pipeline.process_until_caught_up(10).unwrap();
        assert_eq!(result.total_processed, 3);
        assert!(result.committed);
        assert_eq!(
            *calls.lock().unwrap(),
            vec!["index:doc-1", "index:doc-2", "remove:doc-1", "commit"]
        );

        let checkpoint = pipeline.get_checkpoint("recording").unwrap();
        assert_eq!(checkpoint.last_sequence, Some(2));

        // Nothing left to do
        let again = pipeline.process_batch(100).unwrap();
        assert!(!again.has_entries());
    }

    #[test]
    fn test_small_batches_catch_up() {
        let (storage, _temp) = create_test_storage();
        for i in 0..5 {
            storage
                .put_document(&Document::with_id(format!("doc-{}", i), "alice", "T"))
                .unwrap();
        }

        let mut pipeline = IndexingPipeline::new(
            storage,
            PipelineConfig::default().with_batch_size(2),
        );
        pipeline.add_updater(Box::new(RecordingUpdater::default()));
        pipeline.load_checkpoints().unwrap();

        let result = pipeline.process_until_caught_up(10).unwrap();
        assert_eq!(result.total_processed, 5);
        assert_eq!(result.last_sequence, Some(4));
    }

    #[test]
    fn test_checkpoint_survives_restart_and_cleanup() {
        let (storage, _temp) = create_test_storage();
        storage
            .put_document(&Document::with_id("doc-1", "alice", "One"))
            .unwrap();

        let mut pipeline = pipeline_with(storage.clone(), RecordingUpdater::default());
        pipeline.process_until_caught_up(10).unwrap();
        assert_eq!(pipeline.cleanup_outbox().unwrap(), 1);
        assert!(storage.get_outbox_entries(0, 10).unwrap().is_empty());

        storage
            .put_document(&Document::with_id("doc-2", "alice", "Two"))
            .unwrap();

        let updater = RecordingUpdater::default();
        let calls = updater.calls.clone();
        let mut restarted = pipeline_with(storage, updater);
        restarted.process_until_caught_up(10).unwrap();
        assert_eq!(*calls.lock().unwrap(), vec!["index:doc-2", "commit"]);
    }

    #[test]
    fn test_error_stops_processing() {
        let (storage, _temp) = create_test_storage();
        storage
            .put_document(&Document::with_id("doc-1", "alice", "One"))
            .unwrap();

        let updater = RecordingUpdater {
            fail_on: Some("doc-1"),
            ..Default::default()
        };
        let mut pipeline = pipeline_with(storage.clone(), updater);
        assert!(pipeline.process_batch(10).is_err());

        // Nothing was checkpointed, so the entry is retried next time
        let checkpoint = pipeline.get_checkpoint("recording").unwrap();
        assert_eq!(checkpoint.last_sequence, None);
        assert_eq!(storage.get_outbox_entries(0, 10).unwrap().len(), 1);
    }
}

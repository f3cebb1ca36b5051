//! Full rebuild of the text index from storage.
//!
//! Walks every stored document, rebuilds its index entry from the record
//! and its files, and commits once at the end.

use tracing::{info, warn};

use docvault_search::{IndexEntry, SearchIndexer};
use docvault_storage::Storage;

use crate::error::IndexingError;

/// Configuration for index rebuild operations.
#[derive(Debug, Clone)]
pub struct RebuildConfig {
    /// Number of documents between progress reports.
    pub batch_size: usize,
    /// Whether to continue on individual document errors.
    pub continue_on_error: bool,
}

impl Default for RebuildConfig {
    fn default() -> Self {
        Self {
            batch_size: 100,
            continue_on_error: false,
        }
    }
}

impl RebuildConfig {
    pub fn with_batch_size(mut self, size: usize) -> Self {
        self.batch_size = size;
        self
    }

    pub fn with_continue_on_error(mut self, continue_on_error: bool) -> Self {
        self.continue_on_error = continue_on_error;
        self
    }
}

/// Progress tracking for rebuild operations.
#[derive(Debug, Clone, Default)]
pub struct RebuildProgress {
    /// Total documents handled.
    pub total_processed: u64,
    pub documents_indexed: u64,
    /// Documents whose files carried extracted text.
    pub with_content: u64,
    pub errors: u64,
    pub completed: bool,
}

impl RebuildProgress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_document(&mut self, has_content: bool) {
        self.documents_indexed += 1;
        self.total_processed += 1;
        if has_content {
            self.with_content += 1;
        }
    }

    pub fn record_error(&mut self) {
        self.errors += 1;
        self.total_processed += 1;
    }

    pub fn mark_completed(&mut self) {
        self.completed = true;
    }
}

/// Trait for receiving rebuild progress updates.
pub trait ProgressCallback: Send {
    /// Called after each batch of documents is processed.
    fn on_progress(&self, progress: &RebuildProgress);
}

/// A no-op progress callback for when progress reporting isn't needed.
pub struct NoOpProgressCallback;

impl ProgressCallback for NoOpProgressCallback {
    fn on_progress(&self, _progress: &RebuildProgress) {}
}

/// A callback that logs progress at info level.
pub struct LoggingProgressCallback;

impl ProgressCallback for LoggingProgressCallback {
    fn on_progress(&self, progress: &RebuildProgress) {
        info!(
            total = progress.total_processed,
            indexed = progress.documents_indexed,
            with_content = progress.with_content,
            errors = progress.errors,
            completed = progress.completed,
            "Rebuild progress"
        );
    }
}

/// Rebuild the text index from every document in storage.
///
/// On a fatal error the uncommitted rebuild is rolled back, leaving the
/// previously committed index in place.
pub fn rebuild_text_index<P: ProgressCallback>(
    storage: &Storage,
    indexer: &SearchIndexer,
    config: &RebuildConfig,
    progress_callback: &P,
) -> Result<RebuildProgress, IndexingError> {
    let mut progress = RebuildProgress::new();
    let batch_size = config.batch_size.max(1) as u64;

    info!("Starting text index rebuild...");

    indexer.delete_all()?;

    let documents = storage.all_documents()?;
    info!(count = documents.len(), "Found documents to index");

    for document in documents {
        let outcome = storage
            .files_for_document(&document.document_id)
            .map_err(IndexingError::from)
            .and_then(|files| {
                let entry = IndexEntry::from_document(&document, &files);
                indexer.index_entry(&entry)?;
                Ok(!entry.content_text.is_empty())
            });

        match outcome {
            Ok(has_content) => progress.record_document(has_content),
            Err(e) if config.continue_on_error => {
                warn!(doc_id = %document.document_id, error = %e, "Failed to index document");
                progress.record_error();
            }
            Err(e) => {
                indexer.rollback()?;
                return Err(e);
            }
        }

        if progress.total_processed % batch_size == 0 {
            progress_callback.on_progress(&progress);
        }
    }

    indexer.commit()?;
    progress.mark_completed();
    progress_callback.on_progress(&progress);

    info!(
        documents = progress.documents_indexed,
        errors = progress.errors,
        "Text index rebuild complete"
    );

    Ok(progress)
}

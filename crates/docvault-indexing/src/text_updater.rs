//! Text index updater.
//!
//! Rebuilds a document's index entry from storage (record plus files) on
//! every outbox entry, so entries are idempotent and order only matters
//! through the final stored state.

use std::sync::Arc;

use tracing::debug;

use docvault_search::{IndexEntry, SearchIndexer};
use docvault_storage::Storage;

use crate::error::IndexingError;
use crate::updater::IndexUpdater;

pub struct TextIndexUpdater {
    indexer: Arc<SearchIndexer>,
    storage: Arc<Storage>,
}

impl TextIndexUpdater {
    pub const NAME: &'static str = "text";

    pub fn new(indexer: Arc<SearchIndexer>, storage: Arc<Storage>) -> Self {
        Self { indexer, storage }
    }

    /// Build the current entry of a document, if it still exists.
    pub fn build_entry(&self, document_id: &str) -> Result<Option<IndexEntry>, IndexingError> {
        let Some(document) = self.storage.get_document(document_id)? else {
            return Ok(None);
        };
        let files = self.storage.files_for_document(document_id)?;
        Ok(Some(IndexEntry::from_document(&document, &files)))
    }
}

impl IndexUpdater for TextIndexUpdater {
    fn index_document(&self, document_id: &str) -> Result<bool, IndexingError> {
        match self.build_entry(document_id)? {
            Some(entry) => {
                self.indexer.index_entry(&entry)?;
                Ok(true)
            }
            None => {
                debug!(doc_id = %document_id, "Document gone, dropping stale entry");
                self.indexer.delete_document(document_id)?;
                Ok(false)
            }
        }
    }

    fn remove_document(&self, document_id: &str) -> Result<(), IndexingError> {
        self.indexer.delete_document(document_id)?;
        Ok(())
    }

    fn commit(&self) -> Result<(), IndexingError> {
        self.indexer.commit()?;
        Ok(())
    }

    fn rollback(&self) -> Result<(), IndexingError> {
        self.indexer.rollback()?;
        Ok(())
    }

    fn name(&self) -> &str {
        Self::NAME
    }
}

//! Search indexer for writing entries to the Tantivy index.
//!
//! The indexer wraps IndexWriter with shared access via Arc<Mutex>.
//! Entries are not visible until commit() is called and readers reload.

use std::sync::{Arc, Mutex, MutexGuard};

use tantivy::{IndexWriter, Term};
use tracing::{debug, info, warn};

use crate::document::IndexEntry;
use crate::error::SearchError;
use crate::index::SearchIndex;
use crate::schema::SearchSchema;

/// Manages index write operations.
pub struct SearchIndexer {
    writer: Arc<Mutex<IndexWriter>>,
    schema: SearchSchema,
}

impl SearchIndexer {
    /// Create a new indexer from a SearchIndex.
    pub fn new(index: &SearchIndex) -> Result<Self, SearchError> {
        let writer = index.writer()?;
        let schema = index.schema().clone();

        Ok(Self {
            writer: Arc::new(Mutex::new(writer)),
            schema,
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, IndexWriter>, SearchError> {
        self.writer
            .lock()
            .map_err(|e| SearchError::IndexLocked(e.to_string()))
    }

    /// Index one entry, replacing any entry with the same document id.
    pub fn index_entry(&self, entry: &IndexEntry) -> Result<(), SearchError> {
        let doc = entry.to_tantivy_doc(&self.schema);
        let writer = self.lock()?;

        let term = Term::from_field_text(self.schema.doc_id, &entry.document_id);
        writer.delete_term(term);
        writer.add_document(doc)?;

        debug!(doc_id = %entry.document_id, "Indexed document");
        Ok(())
    }

    /// Index multiple entries in batch.
    pub fn index_entries(&self, entries: &[IndexEntry]) -> Result<usize, SearchError> {
        let writer = self.lock()?;

        let mut count = 0;
        for entry in entries {
            let term = Term::from_field_text(self.schema.doc_id, &entry.document_id);
            writer.delete_term(term);
            writer.add_document(entry.to_tantivy_doc(&self.schema))?;
            count += 1;
        }

        debug!(count, "Indexed document batch");
        Ok(count)
    }

    /// Delete the entry of a document.
    pub fn delete_document(&self, doc_id: &str) -> Result<(), SearchError> {
        let writer = self.lock()?;
        let term = Term::from_field_text(self.schema.doc_id, doc_id);
        writer.delete_term(term);

        debug!(doc_id, "Deleted document from index");
        Ok(())
    }

    /// Remove every entry (used before a full rebuild).
    pub fn delete_all(&self) -> Result<(), SearchError> {
        let writer = self.lock()?;
        writer.delete_all_documents()?;
        info!("Cleared search index");
        Ok(())
    }

    /// Commit pending changes to make them searchable.
    pub fn commit(&self) -> Result<u64, SearchError> {
        let mut writer = self.lock()?;
        let opstamp = writer.commit()?;
        debug!(opstamp, "Committed index changes");
        Ok(opstamp)
    }

    /// Rollback uncommitted changes.
    pub fn rollback(&self) -> Result<u64, SearchError> {
        let mut writer = self.lock()?;
        let opstamp = writer.rollback()?;
        warn!(opstamp, "Rolled back index changes");
        Ok(opstamp)
    }
}

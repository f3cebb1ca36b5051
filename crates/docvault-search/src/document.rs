//! Mapping from stored documents to index entries.

use tantivy::doc;
use tantivy::TantivyDocument;

use docvault_types::{Document, StoredFile};

use crate::schema::SearchSchema;

/// The searchable projection of one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
    pub document_id: String,
    /// Title and description
    pub metadata_text: String,
    /// Extracted text of every attached file
    pub content_text: String,
}

impl IndexEntry {
    pub fn new(
        document_id: impl Into<String>,
        metadata_text: impl Into<String>,
        content_text: impl Into<String>,
    ) -> Self {
        Self {
            document_id: document_id.into(),
            metadata_text: metadata_text.into(),
            content_text: content_text.into(),
        }
    }

    /// Build the entry for a document and its files.
    ///
    /// Files without extracted text contribute nothing.
    pub fn from_document(document: &Document, files: &[StoredFile]) -> Self {
        let content_text = files
            .iter()
            .filter_map(|file| file.content.as_deref())
            .collect::<Vec<_>>()
            .join("\n");

        Self {
            document_id: document.document_id.clone(),
            metadata_text: document.metadata_text(),
            content_text,
        }
    }

    pub fn to_tantivy_doc(&self, schema: &SearchSchema) -> TantivyDocument {
        doc!(
            schema.doc_id => self.document_id.clone(),
            schema.metadata => self.metadata_text.clone(),
            schema.content => self.content_text.clone()
        )
    }
}

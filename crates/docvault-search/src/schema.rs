//! Tantivy schema for document index entries.
//!
//! Each document is one index entry with two separately searchable fields:
//! - metadata: title + description
//! - content: text extracted from the attached files

use tantivy::schema::{Field, Schema, STORED, STRING, TEXT};

use crate::SearchError;

/// Searchable text fields of an index entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextField {
    Metadata,
    Content,
}

/// Schema field handles for efficient access
#[derive(Debug, Clone)]
pub struct SearchSchema {
    schema: Schema,
    /// Primary key: document id (STRING | STORED)
    pub doc_id: Field,
    /// Title and description (TEXT)
    pub metadata: Field,
    /// Extracted file text (TEXT)
    pub content: Field,
}

impl SearchSchema {
    /// Get the underlying Tantivy schema
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Field handle for a searchable scope.
    pub fn text_field(&self, field: TextField) -> Field {
        match field {
            TextField::Metadata => self.metadata,
            TextField::Content => self.content,
        }
    }

    /// Create a SearchSchema from an existing Tantivy Schema
    pub fn from_schema(schema: Schema) -> Result<Self, SearchError> {
        let doc_id = schema
            .get_field("doc_id")
            .map_err(|_| SearchError::SchemaMismatch("missing doc_id field".into()))?;
        let metadata = schema
            .get_field("metadata")
            .map_err(|_| SearchError::SchemaMismatch("missing metadata field".into()))?;
        let content = schema
            .get_field("content")
            .map_err(|_| SearchError::SchemaMismatch("missing content field".into()))?;

        Ok(Self {
            schema,
            doc_id,
            metadata,
            content,
        })
    }
}

/// Build the document index schema.
pub fn build_document_schema() -> SearchSchema {
    let mut schema_builder = Schema::builder();

    // Primary key, matched exactly for deletes
    let doc_id = schema_builder.add_text_field("doc_id", STRING | STORED);

    // TEXT indexes positions, which phrase matching needs
    let metadata = schema_builder.add_text_field("metadata", TEXT);
    let content = schema_builder.add_text_field("content", TEXT);

    let schema = schema_builder.build();

    SearchSchema {
        schema,
        doc_id,
        metadata,
        content,
    }
}

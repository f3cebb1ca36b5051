//! # docvault-search
//!
//! Full-text index for docvault using Tantivy.
//!
//! Each document has one index entry with a metadata field (title and
//! description) and a content field (extracted file text). Searches match
//! terms against one or both fields and report a relevance score per
//! matching document.
//!
//! ## Features
//! - Embedded Tantivy index with MmapDirectory for persistence
//! - Replace-by-id writes through a shared writer
//! - Term and phrase matching per field, conjunctive across terms

pub mod document;
pub mod error;
pub mod index;
pub mod indexer;
pub mod schema;
pub mod searcher;

pub use document::IndexEntry;
pub use error::SearchError;
pub use index::{SearchIndex, SearchIndexConfig};
pub use indexer::SearchIndexer;
pub use schema::{build_document_schema, SearchSchema, TextField};
pub use searcher::DocumentSearcher;

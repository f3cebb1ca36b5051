//! Service error types.

use thiserror::Error;

use docvault_indexing::IndexingError;
use docvault_query::QueryError;
use docvault_search::SearchError;
use docvault_storage::StorageError;
use docvault_types::DocvaultError;

/// Errors returned by [`crate::DocumentService`].
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Search error: {0}")]
    Search(#[from] SearchError),

    #[error("Indexing error: {0}")]
    Indexing(#[from] IndexingError),

    #[error("Query error: {0}")]
    Query(#[from] QueryError),

    #[error(transparent)]
    Config(#[from] DocvaultError),

    /// Unknown id, or a record the caller may not see
    #[error("Not found: {0}")]
    NotFound(String),

    /// The caller may see the record but not change it
    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Indexing lock poisoned
    #[error("Lock error: {0}")]
    Lock(String),
}

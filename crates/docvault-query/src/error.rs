//! Query error types.

use docvault_search::SearchError;
use docvault_storage::StorageError;
use thiserror::Error;

/// Failures of the stores a search reads from.
///
/// Malformed query input never produces an error; it narrows or empties
/// the result instead.
#[derive(Debug, Error)]
pub enum QueryError {
    /// Metadata store failed
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Text index failed
    #[error("Search error: {0}")]
    Search(#[from] SearchError),
}

//! Outbox entry type for index updates.
//!
//! Outbox entries are written atomically with document mutations. The
//! indexing hook consumes them to keep the text index in step with storage.

use serde::{Deserialize, Serialize};

/// Type of outbox action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutboxAction {
    /// (Re)build the index entry of the document from storage
    IndexDocument,
    /// Remove the document's index entry
    RemoveDocument,
}

/// An outbox entry awaiting the indexing hook.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutboxEntry {
    /// Document the mutation touched
    pub document_id: String,

    /// Time of the mutation (for ordering and diagnostics)
    pub timestamp_ms: i64,

    /// What action should be performed
    pub action: OutboxAction,
}

impl OutboxEntry {
    /// Create an entry requesting (re)indexing of a document
    pub fn for_index(document_id: impl Into<String>, timestamp_ms: i64) -> Self {
        Self {
            document_id: document_id.into(),
            timestamp_ms,
            action: OutboxAction::IndexDocument,
        }
    }

    /// Create an entry requesting removal of a document from the index
    pub fn for_removal(document_id: impl Into<String>, timestamp_ms: i64) -> Self {
        Self {
            document_id: document_id.into(),
            timestamp_ms,
            action: OutboxAction::RemoveDocument,
        }
    }

    /// Serialize to JSON bytes
    pub fn to_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }

    /// Deserialize from JSON bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }
}

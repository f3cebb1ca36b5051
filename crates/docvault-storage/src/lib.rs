//! Storage layer for docvault.
//!
//! Provides RocksDB-backed storage with:
//! - Column family isolation for documents, tags, shares and files
//! - Pointer keys scanned by prefix for owner and grantee lookups
//! - Atomic writes via WriteBatch, each carrying its outbox entry
//! - Checkpoints for the indexing hook

pub mod column_families;
pub mod db;
pub mod error;
pub mod keys;

pub use db::{Storage, StorageStats};
pub use error::StorageError;
pub use keys::{CheckpointKey, OutboxKey};

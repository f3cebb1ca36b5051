//! # docvault-types
//!
//! Shared domain types for docvault.
//!
//! - Documents and the files attached to them
//! - Tags and shares
//! - Outbox entries driving index updates
//! - Listing requests and responses
//! - Settings

pub mod config;
pub mod document;
pub mod error;
pub mod listing;
pub mod outbox;
pub mod tag;

pub use config::Settings;
pub use document::{Document, StoredFile, DEFAULT_LANGUAGE};
pub use error::DocvaultError;
pub use listing::{
    DocumentList, DocumentSummary, PageRequest, SortColumn, SortOrder, SortSpec, TagSummary,
};
pub use outbox::{OutboxAction, OutboxEntry};
pub use tag::{Share, Tag};

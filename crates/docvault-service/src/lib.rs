//! Document repository service for docvault.
//!
//! [`DocumentService`] owns the metadata store, the text index and the
//! indexing hook, and exposes:
//! - document, file, tag and share lifecycle
//! - search and the plain document listing
//! - index rebuild and statistics for administration

pub mod documents;
pub mod error;
pub mod service;
pub mod sharing;

pub use documents::{DocumentDetail, DocumentUpdate, NewDocument};
pub use error::ServiceError;
pub use service::{DocumentService, ServiceStats};

pub use docvault_query::Viewer;
pub use docvault_types::{DocumentList, PageRequest, SortColumn, SortOrder, SortSpec};

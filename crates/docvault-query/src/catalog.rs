//! Collaborator seams of the search executor.
//!
//! [`DocumentCatalog`] is the metadata side (visibility, tags) and
//! [`TextIndex`] the full-text side. Both are implemented here for the
//! RocksDB storage and the Tantivy searcher.

use std::collections::HashMap;
use std::ops::Range;

use chrono::{DateTime, Utc};

use docvault_search::DocumentSearcher;
use docvault_storage::Storage;
use docvault_types::{Document, Tag};

use crate::error::QueryError;
use crate::viewer::Viewer;

/// Read access to document metadata.
pub trait DocumentCatalog: Send + Sync {
    /// Documents the viewer may see, restricted to a created-date range.
    fn visible_documents(
        &self,
        viewer: &Viewer,
        created: Option<&Range<DateTime<Utc>>>,
    ) -> Result<Vec<Document>, QueryError>;

    /// Tags owned by a user.
    fn tags_for_owner(&self, owner_id: &str) -> Result<Vec<Tag>, QueryError>;

    fn get_tag(&self, tag_id: &str) -> Result<Option<Tag>, QueryError>;
}

/// Term matching against the metadata and content fields.
pub trait TextIndex: Send + Sync {
    /// Relevance per matching document id; None when both term lists are
    /// empty. A term that can match nothing yields an empty map.
    fn match_terms(
        &self,
        any_scope_terms: &[String],
        content_terms: &[String],
    ) -> Result<Option<HashMap<String, f32>>, QueryError>;
}

impl DocumentCatalog for Storage {
    fn visible_documents(
        &self,
        viewer: &Viewer,
        created: Option<&Range<DateTime<Utc>>>,
    ) -> Result<Vec<Document>, QueryError> {
        Ok(Storage::visible_documents(
            self,
            &viewer.user_id,
            &viewer.share_ids,
            created,
        )?)
    }

    fn tags_for_owner(&self, owner_id: &str) -> Result<Vec<Tag>, QueryError> {
        Ok(Storage::tags_for_owner(self, owner_id)?)
    }

    fn get_tag(&self, tag_id: &str) -> Result<Option<Tag>, QueryError> {
        Ok(Storage::get_tag(self, tag_id)?)
    }
}

impl TextIndex for DocumentSearcher {
    fn match_terms(
        &self,
        any_scope_terms: &[String],
        content_terms: &[String],
    ) -> Result<Option<HashMap<String, f32>>, QueryError> {
        Ok(DocumentSearcher::match_terms(
            self,
            any_scope_terms,
            content_terms,
        )?)
    }
}

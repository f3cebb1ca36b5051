//! Tags and shares.
//!
//! Neither is part of the text index; both are read fresh by every search.

use tracing::info;

use docvault_types::{Share, Tag};

use crate::error::ServiceError;
use crate::service::DocumentService;

const MAX_TAG_NAME_LEN: usize = 36;

impl DocumentService {
    /// Create a tag for `user_id`.
    ///
    /// Names are unique per owner and may not contain whitespace.
    pub fn create_tag(&self, user_id: &str, name: &str, color: &str) -> Result<Tag, ServiceError> {
        if user_id.trim().is_empty() {
            return Err(ServiceError::InvalidInput("user id is required".to_string()));
        }
        if name.is_empty() || name.chars().count() > MAX_TAG_NAME_LEN {
            return Err(ServiceError::InvalidInput(format!(
                "tag name must be 1 to {} characters",
                MAX_TAG_NAME_LEN
            )));
        }
        if name.chars().any(char::is_whitespace) {
            return Err(ServiceError::InvalidInput(
                "tag name may not contain whitespace".to_string(),
            ));
        }
        if !Tag::is_valid_color(color) {
            return Err(ServiceError::InvalidInput(format!("invalid color: {}", color)));
        }
        let existing = self.storage.tags_for_owner(user_id)?;
        if existing.iter().any(|tag| tag.name == name) {
            return Err(ServiceError::InvalidInput(format!("tag {} already exists", name)));
        }

        let tag = Tag::new(user_id, name, color);
        self.storage.put_tag(&tag)?;
        info!(tag_id = %tag.tag_id, owner = %user_id, "Created tag");
        Ok(tag)
    }

    pub fn tags(&self, user_id: &str) -> Result<Vec<Tag>, ServiceError> {
        Ok(self.storage.tags_for_owner(user_id)?)
    }

    /// Delete a tag and detach it from its owner's documents.
    pub fn delete_tag(&self, user_id: &str, tag_id: &str) -> Result<(), ServiceError> {
        match self.storage.get_tag(tag_id)? {
            Some(tag) if tag.owner_id == user_id => {
                self.storage.delete_tag(tag_id)?;
                Ok(())
            }
            _ => Err(ServiceError::NotFound(format!("tag {}", tag_id))),
        }
    }

    /// Share a document. With a grantee the document becomes visible to
    /// that user; without one the share is a link.
    pub fn share_document(
        &self,
        user_id: &str,
        document_id: &str,
        name: Option<&str>,
        grantee_id: Option<&str>,
    ) -> Result<Share, ServiceError> {
        self.owned_document(user_id, document_id)?;

        let mut share = match grantee_id.map(str::trim) {
            Some(grantee) if grantee == user_id => {
                return Err(ServiceError::InvalidInput(
                    "cannot share a document with its creator".to_string(),
                ));
            }
            Some(grantee) if !grantee.is_empty() => Share::grant(document_id, grantee),
            _ => Share::link(document_id),
        };
        if let Some(name) = name.map(str::trim).filter(|n| !n.is_empty()) {
            share = share.with_name(name);
        }

        self.storage.put_share(&share)?;
        info!(share_id = %share.share_id, document_id = %document_id, "Shared document");
        Ok(share)
    }

    /// Remove a share. Only the document creator may do so.
    pub fn unshare(&self, user_id: &str, share_id: &str) -> Result<(), ServiceError> {
        let share = self
            .storage
            .get_share(share_id)?
            .ok_or_else(|| ServiceError::NotFound(format!("share {}", share_id)))?;
        self.owned_document(user_id, &share.document_id)?;
        self.storage.delete_share(share_id)?;
        Ok(())
    }
}

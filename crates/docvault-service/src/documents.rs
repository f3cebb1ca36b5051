//! Document and file lifecycle.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use docvault_query::Viewer;
use docvault_types::{Document, DocumentSummary, StoredFile, TagSummary, DEFAULT_LANGUAGE};

use crate::error::ServiceError;
use crate::service::DocumentService;

const MAX_TITLE_LEN: usize = 100;
const MAX_DESCRIPTION_LEN: usize = 4000;

/// Fields of a new document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewDocument {
    pub title: String,
    pub description: Option<String>,
    /// Defaults to `eng`
    pub language: Option<String>,
    /// Defaults to now
    pub create_date: Option<DateTime<Utc>>,
    pub tag_ids: Vec<String>,
}

impl NewDocument {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }
}

/// Changes to an existing document. `None` keeps the current value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub language: Option<String>,
    pub create_date: Option<DateTime<Utc>>,
    /// Replaces the whole tag set when present
    pub tag_ids: Option<Vec<String>>,
}

/// A single document as shown to a viewer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentDetail {
    pub creator: String,
    #[serde(flatten)]
    pub summary: DocumentSummary,
}

fn validate_title(title: &str) -> Result<String, ServiceError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(ServiceError::InvalidInput("title is required".to_string()));
    }
    if title.chars().count() > MAX_TITLE_LEN {
        return Err(ServiceError::InvalidInput(format!(
            "title is longer than {} characters",
            MAX_TITLE_LEN
        )));
    }
    Ok(title.to_string())
}

fn validate_description(description: Option<&str>) -> Result<Option<String>, ServiceError> {
    let Some(description) = description.map(str::trim).filter(|d| !d.is_empty()) else {
        return Ok(None);
    };
    if description.chars().count() > MAX_DESCRIPTION_LEN {
        return Err(ServiceError::InvalidInput(format!(
            "description is longer than {} characters",
            MAX_DESCRIPTION_LEN
        )));
    }
    Ok(Some(description.to_string()))
}

/// Language codes are three lowercase ASCII letters.
fn validate_language(language: &str) -> Result<String, ServiceError> {
    if language.len() == 3 && language.chars().all(|c| c.is_ascii_lowercase()) {
        Ok(language.to_string())
    } else {
        Err(ServiceError::InvalidInput(format!(
            "invalid language code: {}",
            language
        )))
    }
}

impl DocumentService {
    /// Tag ids must name tags the document creator owns.
    fn validate_tags(
        &self,
        creator_id: &str,
        tag_ids: &[String],
    ) -> Result<BTreeSet<String>, ServiceError> {
        let mut validated = BTreeSet::new();
        for tag_id in tag_ids {
            match self.storage.get_tag(tag_id)? {
                Some(tag) if tag.owner_id == creator_id => {
                    validated.insert(tag.tag_id);
                }
                _ => return Err(ServiceError::InvalidInput(format!("unknown tag {}", tag_id))),
            }
        }
        Ok(validated)
    }

    /// Create a document owned by `user_id`.
    pub fn create_document(
        &self,
        user_id: &str,
        input: NewDocument,
    ) -> Result<Document, ServiceError> {
        if user_id.trim().is_empty() {
            return Err(ServiceError::InvalidInput("user id is required".to_string()));
        }
        let title = validate_title(&input.title)?;
        let mut document = Document::new(user_id, title);
        document.description = validate_description(input.description.as_deref())?;
        document.language =
            validate_language(input.language.as_deref().unwrap_or(DEFAULT_LANGUAGE))?;
        if let Some(create_date) = input.create_date {
            document.create_date = create_date;
        }
        document.tag_ids = self.validate_tags(user_id, &input.tag_ids)?;

        self.storage.put_document(&document)?;
        self.sync_index()?;

        info!(document_id = %document.document_id, creator = %user_id, "Created document");
        Ok(document)
    }

    /// Update a document. Only its creator may do so.
    pub fn update_document(
        &self,
        user_id: &str,
        document_id: &str,
        update: DocumentUpdate,
    ) -> Result<Document, ServiceError> {
        let mut document = self.owned_document(user_id, document_id)?;

        if let Some(title) = &update.title {
            document.title = validate_title(title)?;
        }
        if let Some(description) = &update.description {
            document.description = validate_description(Some(description))?;
        }
        if let Some(language) = &update.language {
            document.language = validate_language(language)?;
        }
        if let Some(create_date) = update.create_date {
            document.create_date = create_date;
        }
        if let Some(tag_ids) = &update.tag_ids {
            document.tag_ids = self.validate_tags(user_id, tag_ids)?;
        }

        self.storage.put_document(&document)?;
        self.sync_index()?;

        info!(document_id = %document_id, "Updated document");
        Ok(document)
    }

    /// Delete a document with its files and shares. Only its creator may do so.
    pub fn delete_document(&self, user_id: &str, document_id: &str) -> Result<(), ServiceError> {
        self.owned_document(user_id, document_id)?;
        self.storage.delete_document(document_id)?;
        self.sync_index()?;
        Ok(())
    }

    /// Load a document the viewer may see.
    ///
    /// Documents outside the viewer's visibility are reported as not found.
    pub fn get_document(
        &self,
        viewer: &Viewer,
        document_id: &str,
    ) -> Result<DocumentDetail, ServiceError> {
        let not_found = || ServiceError::NotFound(format!("document {}", document_id));
        let document = self.storage.get_document(document_id)?.ok_or_else(not_found)?;
        if !self.can_view(viewer, &document)? {
            return Err(not_found());
        }

        let mut tags = Vec::with_capacity(document.tag_ids.len());
        for tag_id in &document.tag_ids {
            if let Some(tag) = self.storage.get_tag(tag_id)? {
                tags.push(TagSummary::from(&tag));
            }
        }
        tags.sort_by(|a, b| a.name.cmp(&b.name));

        Ok(DocumentDetail {
            creator: document.creator_id.clone(),
            summary: DocumentSummary::from_document(&document, tags),
        })
    }

    /// Attach a file whose text has already been extracted.
    pub fn add_file(
        &self,
        user_id: &str,
        document_id: &str,
        name: &str,
        mime_type: &str,
        content: Option<String>,
    ) -> Result<StoredFile, ServiceError> {
        self.owned_document(user_id, document_id)?;
        if name.trim().is_empty() {
            return Err(ServiceError::InvalidInput("file name is required".to_string()));
        }

        let mut file = StoredFile::new(document_id, name.trim(), mime_type);
        file.content = content.filter(|text| !text.trim().is_empty());
        self.storage.put_file(&file)?;
        self.sync_index()?;

        info!(file_id = %file.file_id, document_id = %document_id, "Attached file");
        Ok(file)
    }

    /// Remove a file from its document.
    pub fn delete_file(&self, user_id: &str, file_id: &str) -> Result<(), ServiceError> {
        let file = self
            .storage
            .get_file(file_id)?
            .ok_or_else(|| ServiceError::NotFound(format!("file {}", file_id)))?;
        self.owned_document(user_id, &file.document_id)?;
        self.storage.delete_file(file_id)?;
        self.sync_index()?;
        Ok(())
    }

    pub fn files(&self, viewer: &Viewer, document_id: &str) -> Result<Vec<StoredFile>, ServiceError> {
        self.get_document(viewer, document_id)?;
        Ok(self.storage.files_for_document(document_id)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_is_trimmed_and_required() {
        assert_eq!(validate_title("  Lease  ").unwrap(), "Lease");
        assert!(validate_title("   ").is_err());
        assert!(validate_title(&"x".repeat(MAX_TITLE_LEN + 1)).is_err());
    }

    #[test]
    fn test_blank_description_is_dropped() {
        assert_eq!(validate_description(Some("  ")).unwrap(), None);
        assert_eq!(validate_description(None).unwrap(), None);
        assert_eq!(
            validate_description(Some(" body ")).unwrap().as_deref(),
            Some("body")
        );
    }

    #[test]
    fn test_language_codes() {
        assert!(validate_language("eng").is_ok());
        assert!(validate_language("fra").is_ok());
        assert!(validate_language("ENG").is_err());
        assert!(validate_language("en").is_err());
    }

    #[test]
    fn test_detail_json_is_flat() {
        let document = Document::with_id("doc-1", "alice", "Lease");
        let detail = DocumentDetail {
            creator: "alice".to_string(),
            summary: DocumentSummary::from_document(&document, Vec::new()),
        };
        let json = serde_json::to_value(&detail).unwrap();
        assert_eq!(json["creator"], "alice");
        assert_eq!(json["id"], "doc-1");
        assert_eq!(json["file_count"], 0);
        assert_eq!(json["language"], "eng");
    }
}

//! Document and file types.
//!
//! A document is the unit users search for. Files hang off a document and
//! contribute their extracted text to the document's full-content field.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ulid::Ulid;

/// Language assigned to documents created without one (ISO 639-2).
pub const DEFAULT_LANGUAGE: &str = "eng";

/// A document owned by a single user.
///
/// `shared` and `file_count` are derived from the share and file records
/// when the document is read back; they are never persisted with it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Unique identifier (ULID)
    pub document_id: String,

    /// User who created and owns the document
    pub creator_id: String,

    pub title: String,

    #[serde(default)]
    pub description: Option<String>,

    /// ISO 639-2 language code
    pub language: String,

    /// User-supplied creation date; defaults to the time of creation
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub create_date: DateTime<Utc>,

    /// Tags attached to the document, by tag id
    #[serde(default)]
    pub tag_ids: BTreeSet<String>,

    /// Whether at least one share exists for this document
    #[serde(skip)]
    pub shared: bool,

    /// Number of files attached to this document
    #[serde(skip)]
    pub file_count: usize,
}

impl Document {
    /// Create a new document with a fresh id.
    pub fn new(creator_id: impl Into<String>, title: impl Into<String>) -> Self {
        Self::with_id(Ulid::new().to_string(), creator_id, title)
    }

    /// Create a document with an explicit id.
    pub fn with_id(
        document_id: impl Into<String>,
        creator_id: impl Into<String>,
        title: impl Into<String>,
    ) -> Self {
        Self {
            document_id: document_id.into(),
            creator_id: creator_id.into(),
            title: title.into(),
            description: None,
            language: DEFAULT_LANGUAGE.to_string(),
            create_date: Utc::now(),
            tag_ids: BTreeSet::new(),
            shared: false,
            file_count: 0,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn with_create_date(mut self, create_date: DateTime<Utc>) -> Self {
        self.create_date = create_date;
        self
    }

    pub fn with_tags<I, S>(mut self, tag_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tag_ids = tag_ids.into_iter().map(Into::into).collect();
        self
    }

    /// Text fed to the metadata field of the search index.
    pub fn metadata_text(&self) -> String {
        match &self.description {
            Some(description) if !description.is_empty() => {
                format!("{}\n{}", self.title, description)
            }
            _ => self.title.clone(),
        }
    }

    /// Create date as milliseconds since the Unix epoch.
    pub fn create_date_ms(&self) -> i64 {
        self.create_date.timestamp_millis()
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

/// A file attached to a document.
///
/// Storage of the file bytes and text extraction happen upstream; only the
/// descriptor and the extracted text reach docvault.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredFile {
    pub file_id: String,

    pub document_id: String,

    /// Original file name
    pub name: String,

    pub mime_type: String,

    /// Text extracted from the file, if extraction produced any
    #[serde(default)]
    pub content: Option<String>,

    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
}

impl StoredFile {
    pub fn new(
        document_id: impl Into<String>,
        name: impl Into<String>,
        mime_type: impl Into<String>,
    ) -> Self {
        Self {
            file_id: Ulid::new().to_string(),
            document_id: document_id.into(),
            name: name.into(),
            mime_type: mime_type.into(),
            content: None,
            created_at: Utc::now(),
        }
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
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

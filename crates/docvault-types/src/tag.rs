//! Tags and shares.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ulid::Ulid;

/// A user-owned label that can be attached to that user's documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub tag_id: String,
    pub owner_id: String,
    pub name: String,
    /// Display color, `#rrggbb`
    pub color: String,
}

impl Tag {
    pub fn new(
        owner_id: impl Into<String>,
        name: impl Into<String>,
        color: impl Into<String>,
    ) -> Self {
        Self {
            tag_id: Ulid::new().to_string(),
            owner_id: owner_id.into(),
            name: name.into(),
            color: color.into(),
        }
    }

    /// Case-insensitive substring match on the tag name.
    pub fn name_matches(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(&needle.to_lowercase())
    }

    /// Whether `color` has the `#rrggbb` shape.
    pub fn is_valid_color(color: &str) -> bool {
        color.len() == 7
            && color.starts_with('#')
            && color[1..].chars().all(|c| c.is_ascii_hexdigit())
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

/// An active share of a document.
///
/// With a grantee the document becomes visible to that user. Without one the
/// share is a link: whoever presents its id may see the document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Share {
    pub share_id: String,
    pub document_id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub grantee_id: Option<String>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
}

impl Share {
    /// Create a link share for a document.
    pub fn link(document_id: impl Into<String>) -> Self {
        Self {
            share_id: Ulid::new().to_string(),
            document_id: document_id.into(),
            name: None,
            grantee_id: None,
            created_at: Utc::now(),
        }
    }

    /// Create a share granting a specific user access.
    pub fn grant(document_id: impl Into<String>, grantee_id: impl Into<String>) -> Self {
        Self {
            grantee_id: Some(grantee_id.into()),
            ..Self::link(document_id)
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
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

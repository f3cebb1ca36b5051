//! Listing request and response types.
//!
//! The shape mirrors what the document listing endpoint returns: a page of
//! document summaries plus the total number of matches.

use serde::{Deserialize, Serialize};

use crate::document::Document;
use crate::tag::Tag;

/// Column a listing is ordered by.
///
/// Callers address columns by index; unknown indexes fall back to the
/// creation date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortColumn {
    Title,
    Description,
    Language,
    #[default]
    CreateDate,
    Shared,
    FileCount,
    /// Text relevance; documents without a score rank last
    Relevance,
}

impl SortColumn {
    const ALL: [SortColumn; 7] = [
        SortColumn::Title,
        SortColumn::Description,
        SortColumn::Language,
        SortColumn::CreateDate,
        SortColumn::Shared,
        SortColumn::FileCount,
        SortColumn::Relevance,
    ];

    pub fn from_index(index: u32) -> Self {
        Self::ALL
            .get(index as usize)
            .copied()
            .unwrap_or_default()
    }

    pub fn index(&self) -> u32 {
        match self {
            SortColumn::Title => 0,
            SortColumn::Description => 1,
            SortColumn::Language => 2,
            SortColumn::CreateDate => 3,
            SortColumn::Shared => 4,
            SortColumn::FileCount => 5,
            SortColumn::Relevance => 6,
        }
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Ascending,
    #[default]
    Descending,
}

impl SortOrder {
    pub fn from_ascending(asc: bool) -> Self {
        if asc {
            SortOrder::Ascending
        } else {
            SortOrder::Descending
        }
    }
}

/// Sort column plus direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SortSpec {
    pub column: SortColumn,
    pub order: SortOrder,
}

impl SortSpec {
    pub fn new(column: SortColumn, order: SortOrder) -> Self {
        Self { column, order }
    }

    /// Build from the wire parameters (`sort_column`, `asc`).
    pub fn from_params(sort_column: Option<u32>, asc: Option<bool>) -> Self {
        Self {
            column: sort_column.map(SortColumn::from_index).unwrap_or_default(),
            order: asc.map(SortOrder::from_ascending).unwrap_or_default(),
        }
    }
}

/// Offset/limit paging. A missing limit means "use the configured default".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PageRequest {
    pub offset: usize,
    pub limit: Option<usize>,
}

impl PageRequest {
    pub fn new(offset: usize, limit: usize) -> Self {
        Self {
            offset,
            limit: Some(limit),
        }
    }

    /// Effective limit given the configured default and maximum.
    pub fn effective_limit(&self, default_limit: usize, max_limit: usize) -> usize {
        self.limit.unwrap_or(default_limit).min(max_limit)
    }
}

/// Tag as shown inside a document summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagSummary {
    pub id: String,
    pub name: String,
    pub color: String,
}

impl From<&Tag> for TagSummary {
    fn from(tag: &Tag) -> Self {
        Self {
            id: tag.tag_id.clone(),
            name: tag.name.clone(),
            color: tag.color.clone(),
        }
    }
}

/// One row of a document listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentSummary {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub language: String,
    /// Milliseconds since the Unix epoch
    pub create_date: i64,
    pub file_count: usize,
    pub shared: bool,
    pub tags: Vec<TagSummary>,
}

impl DocumentSummary {
    /// Build a summary; `tags` are the resolved tags of the document.
    pub fn from_document(document: &Document, tags: Vec<TagSummary>) -> Self {
        Self {
            id: document.document_id.clone(),
            title: document.title.clone(),
            description: document.description.clone(),
            language: document.language.clone(),
            create_date: document.create_date_ms(),
            file_count: document.file_count,
            shared: document.shared,
            tags,
        }
    }
}

/// A page of documents plus the number of documents matching overall.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentList {
    pub documents: Vec<DocumentSummary>,
    pub total: usize,
}

impl DocumentList {
    pub fn empty() -> Self {
        Self::default()
    }
}

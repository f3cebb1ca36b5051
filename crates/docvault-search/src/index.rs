//! On-disk text index.
//!
//! One directory holds the Tantivy index for every document entry. A
//! directory written with another schema is refused rather than reused.

use std::fs;
use std::path::{Path, PathBuf};

use tantivy::directory::MmapDirectory;
use tantivy::{Index, IndexReader, IndexWriter, ReloadPolicy};
use tracing::{debug, info};

use crate::error::SearchError;
use crate::schema::{build_document_schema, SearchSchema};

const DEFAULT_WRITER_MEMORY_MB: usize = 50;

/// Where the index lives and how much memory its writer may buffer.
#[derive(Debug, Clone)]
pub struct SearchIndexConfig {
    pub index_path: PathBuf,
    pub writer_memory_mb: usize,
}

impl SearchIndexConfig {
    pub fn new(index_path: impl Into<PathBuf>) -> Self {
        Self {
            index_path: index_path.into(),
            writer_memory_mb: DEFAULT_WRITER_MEMORY_MB,
        }
    }

    pub fn with_memory_mb(mut self, mb: usize) -> Self {
        self.writer_memory_mb = mb;
        self
    }
}

/// The document index with its resolved field handles.
pub struct SearchIndex {
    index: Index,
    schema: SearchSchema,
    writer_memory_mb: usize,
}

impl SearchIndex {
    /// Open the index under `config.index_path`, creating it when the
    /// directory holds none yet.
    pub fn open_or_create(config: SearchIndexConfig) -> Result<Self, SearchError> {
        let index = open_or_create_index(&config.index_path)?;
        let schema = SearchSchema::from_schema(index.schema())?;
        info!(path = ?config.index_path, memory_mb = config.writer_memory_mb, "Opened text index");

        Ok(Self {
            index,
            schema,
            writer_memory_mb: config.writer_memory_mb,
        })
    }

    pub fn schema(&self) -> &SearchSchema {
        &self.schema
    }

    pub fn index(&self) -> &Index {
        &self.index
    }

    /// The single writer for this index.
    pub fn writer(&self) -> Result<IndexWriter, SearchError> {
        let writer = self.index.writer(self.writer_memory_mb * 1024 * 1024)?;
        debug!(memory_mb = self.writer_memory_mb, "Created index writer");
        Ok(writer)
    }

    /// A reader that moves forward only on explicit reload.
    ///
    /// Mutations reload after committing so that a search issued right
    /// after a mutation observes it.
    pub fn reader(&self) -> Result<IndexReader, SearchError> {
        let reader = self
            .index
            .reader_builder()
            .reload_policy(ReloadPolicy::Manual)
            .try_into()?;
        Ok(reader)
    }
}

fn open_or_create_index(path: &Path) -> Result<Index, SearchError> {
    fs::create_dir_all(path)?;
    let directory = MmapDirectory::open(path).map_err(tantivy::TantivyError::from)?;
    if Index::exists(&directory).map_err(tantivy::TantivyError::from)? {
        debug!(path = ?path, "Opening existing index");
    } else {
        info!(path = ?path, "Creating new index");
    }
    let schema = build_document_schema();
    Ok(Index::open_or_create(directory, schema.schema().clone())?)
}

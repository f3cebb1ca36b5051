//! Indexing hook for docvault.
//!
//! Consumes storage outbox entries and keeps the text index consistent
//! with document metadata and file content.
//!
//! ## Key Components
//!
//! - [`IndexUpdater`]: Trait for index-specific update operations
//! - [`TextIndexUpdater`]: Rebuilds Tantivy entries from storage
//! - [`IndexingPipeline`]: Drives updaters in outbox order with checkpointing
//! - [`rebuild_text_index`]: Reconstructs the index from scratch
//!
//! ## Architecture
//!
//! 1. Mutations are written with outbox entries atomically
//! 2. The pipeline consumes outbox entries in sequence order
//! 3. Each [`IndexUpdater`] applies them and is committed per batch
//! 4. Checkpoints track progress for crash recovery
//! 5. Entries every updater has committed past are deleted
//!
//! ## Example
//!
//! ```ignore
//! use docvault_indexing::{IndexingPipeline, PipelineConfig, TextIndexUpdater};
//!
//! let mut pipeline = IndexingPipeline::new(storage.clone(), PipelineConfig::default());
//! pipeline.add_updater(Box::new(TextIndexUpdater::new(indexer, storage)));
//! pipeline.load_checkpoints()?;
//!
//! pipeline.process_until_caught_up(100)?;
//! pipeline.cleanup_outbox()?;
//! ```

pub mod checkpoint;
pub mod error;
pub mod pipeline;
pub mod rebuild;
pub mod text_updater;
pub mod updater;

pub use checkpoint::IndexCheckpoint;
pub use error::IndexingError;
pub use pipeline::{IndexingPipeline, PipelineConfig, ProcessResult};
pub use rebuild::{
    rebuild_text_index, LoggingProgressCallback, NoOpProgressCallback, ProgressCallback,
    RebuildConfig, RebuildProgress,
};
pub use text_updater::TextIndexUpdater;
pub use updater::{IndexUpdater, UpdateResult};

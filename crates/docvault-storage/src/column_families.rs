//! Column family definitions for RocksDB.
//!
//! - documents: document records keyed by id
//! - documents_by_owner: owner -> document pointers
//! - tags: tag records plus owner -> tag pointers
//! - shares: share records plus document and grantee pointers
//! - files: file records (with extracted text) plus document pointers
//! - outbox: queue of pending index updates (FIFO compaction)
//! - checkpoints: indexing progress

use rocksdb::{ColumnFamilyDescriptor, Options};

/// Column family name for document records
pub const CF_DOCUMENTS: &str = "documents";

/// Column family name for the owner index
pub const CF_DOCUMENTS_BY_OWNER: &str = "documents_by_owner";

/// Column family name for tags
pub const CF_TAGS: &str = "tags";

/// Column family name for shares
pub const CF_SHARES: &str = "shares";

/// Column family name for files
pub const CF_FILES: &str = "files";

/// Column family name for outbox queue (index updates)
pub const CF_OUTBOX: &str = "outbox";

/// Column family name for indexing checkpoints
pub const CF_CHECKPOINTS: &str = "checkpoints";

/// All column family names
pub const ALL_CF_NAMES: &[&str] = &[
    CF_DOCUMENTS,
    CF_DOCUMENTS_BY_OWNER,
    CF_TAGS,
    CF_SHARES,
    CF_FILES,
    CF_OUTBOX,
    CF_CHECKPOINTS,
];

/// Files carry extracted text; compress it.
fn files_options() -> Options {
    let mut opts = Options::default();
    opts.set_compression_type(rocksdb::DBCompressionType::Zstd);
    opts
}

/// Create column family options for outbox (FIFO for queue behavior)
fn outbox_options() -> Options {
    let mut opts = Options::default();
    opts.set_compaction_style(rocksdb::DBCompactionStyle::Fifo);
    // Set max table files size for FIFO (required)
    opts.set_fifo_compaction_options(&rocksdb::FifoCompactOptions::default());
    opts
}

/// Build all column family descriptors
pub fn build_cf_descriptors() -> Vec<ColumnFamilyDescriptor> {
    vec![
        ColumnFamilyDescriptor::new(CF_DOCUMENTS, Options::default()),
        ColumnFamilyDescriptor::new(CF_DOCUMENTS_BY_OWNER, Options::default()),
        ColumnFamilyDescriptor::new(CF_TAGS, Options::default()),
        ColumnFamilyDescriptor::new(CF_SHARES, Options::default()),
        ColumnFamilyDescriptor::new(CF_FILES, files_options()),
        ColumnFamilyDescriptor::new(CF_OUTBOX, outbox_options()),
        ColumnFamilyDescriptor::new(CF_CHECKPOINTS, Options::default()),
    ]
}

//! RocksDB wrapper for docvault metadata.
//!
//! Provides:
//! - Database open/close with column family setup
//! - Atomic write batches (record + pointers + outbox entry)
//! - Visibility-scoped document reads for search
//! - Outbox and checkpoint access for the indexing hook

use std::collections::BTreeMap;
use std::ops::Range;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use rocksdb::{ColumnFamily, Direction, IteratorMode, Options, WriteBatch, DB};
use tracing::{debug, info};

use docvault_types::{Document, OutboxEntry, Share, StoredFile, Tag};

use crate::column_families::{
    build_cf_descriptors, ALL_CF_NAMES, CF_CHECKPOINTS, CF_DOCUMENTS, CF_DOCUMENTS_BY_OWNER,
    CF_FILES, CF_OUTBOX, CF_SHARES, CF_TAGS,
};
use crate::error::StorageError;
use crate::keys::{
    pointer_key, pointer_prefix, pointer_tail, record_key, validate_segment, CheckpointKey,
    OutboxKey, DOC, FILE, GRANTEE, OWNER, SHARE, TAG,
};

/// Main storage interface for docvault metadata
pub struct Storage {
    db: DB,
    /// Outbox sequence counter for monotonic ordering
    outbox_sequence: AtomicU64,
    /// Serializes read-modify-write mutations (cascading deletes, owner moves)
    write_lock: Mutex<()>,
}

impl Storage {
    /// Open storage at the given path, creating if necessary
    pub fn open(path: &Path) -> Result<Self, StorageError> {
        info!("Opening storage at {:?}", path);

        let mut db_opts = Options::default();
        db_opts.create_if_missing(true);
        db_opts.create_missing_column_families(true);
        db_opts.set_max_background_jobs(4);

        let cf_descriptors = build_cf_descriptors();
        let db = DB::open_cf_descriptors(&db_opts, path, cf_descriptors)?;

        // Initialize outbox sequence from highest existing key
        let outbox_sequence = Self::load_outbox_sequence(&db)?;

        Ok(Self {
            db,
            outbox_sequence: AtomicU64::new(outbox_sequence),
            write_lock: Mutex::new(()),
        })
    }

    /// Load the highest outbox sequence number from storage
    fn load_outbox_sequence(db: &DB) -> Result<u64, StorageError> {
        let cf = db
            .cf_handle(CF_OUTBOX)
            .ok_or_else(|| StorageError::ColumnFamilyNotFound(CF_OUTBOX.to_string()))?;

        // Iterate in reverse to find highest key
        let mut iter = db.iterator_cf(cf, IteratorMode::End);
        if let Some(result) = iter.next() {
            let (key, _) = result?;
            let outbox_key = OutboxKey::from_bytes(&key)?;
            return Ok(outbox_key.sequence + 1);
        }
        Ok(0)
    }

    /// Get next outbox sequence number
    fn next_outbox_sequence(&self) -> u64 {
        self.outbox_sequence.fetch_add(1, Ordering::SeqCst)
    }

    fn cf(&self, name: &str) -> Result<&ColumnFamily, StorageError> {
        self.db
            .cf_handle(name)
            .ok_or_else(|| StorageError::ColumnFamilyNotFound(name.to_string()))
    }

    fn lock(&self) -> Result<MutexGuard<'_, ()>, StorageError> {
        self.write_lock
            .lock()
            .map_err(|e| StorageError::Lock(e.to_string()))
    }

    /// Append an outbox entry to a pending batch.
    fn push_outbox(&self, batch: &mut WriteBatch, entry: &OutboxEntry) -> Result<u64, StorageError> {
        let outbox_cf = self.cf(CF_OUTBOX)?;
        let key = OutboxKey::new(self.next_outbox_sequence());
        batch.put_cf(outbox_cf, key.to_bytes(), entry.to_bytes()?);
        Ok(key.sequence)
    }

    /// Collect all (key, value) pairs under a prefix.
    fn scan_prefix(
        &self,
        cf_name: &str,
        prefix: &[u8],
    ) -> Result<Vec<(Vec<u8>, Vec<u8>)>, StorageError> {
        let cf = self.cf(cf_name)?;
        let iter = self
            .db
            .iterator_cf(cf, IteratorMode::From(prefix, Direction::Forward));

        let mut results = Vec::new();
        for item in iter {
            let (key, value) = item?;
            if !key.starts_with(prefix) {
                break;
            }
            results.push((key.to_vec(), value.to_vec()));
        }
        Ok(results)
    }

    fn count_prefix(&self, cf_name: &str, prefix: &[u8]) -> Result<u64, StorageError> {
        let cf = self.cf(cf_name)?;
        let iter = self
            .db
            .iterator_cf(cf, IteratorMode::From(prefix, Direction::Forward));

        let mut count = 0u64;
        for item in iter {
            let (key, _) = item?;
            if !key.starts_with(prefix) {
                break;
            }
            count += 1;
        }
        Ok(count)
    }

    /// Ids pointed to by pointer keys under `prefix` (single trailing segment).
    fn pointer_targets(&self, cf_name: &str, prefix: &[u8]) -> Result<Vec<String>, StorageError> {
        let mut targets = Vec::new();
        for (key, _) in self.scan_prefix(cf_name, prefix)? {
            let mut tail = pointer_tail(&key, prefix)?;
            if tail.len() == 1 {
                targets.extend(tail.pop());
            }
        }
        Ok(targets)
    }

    // ==================== Documents ====================

    /// Store a document, creating or replacing it.
    ///
    /// The record, its owner pointer and an index outbox entry are written
    /// in one batch.
    pub fn put_document(&self, document: &Document) -> Result<(), StorageError> {
        validate_segment(&document.document_id)?;
        validate_segment(&document.creator_id)?;

        let docs_cf = self.cf(CF_DOCUMENTS)?;
        let owner_cf = self.cf(CF_DOCUMENTS_BY_OWNER)?;

        let _guard = self.lock()?;
        let mut batch = WriteBatch::default();

        // A changed creator must not leave the old owner pointer behind
        if let Some(previous) = self.load_document(&document.document_id)? {
            if previous.creator_id != document.creator_id {
                batch.delete_cf(
                    owner_cf,
                    pointer_key(OWNER, &[&previous.creator_id, &previous.document_id]),
                );
            }
        }

        batch.put_cf(
            docs_cf,
            record_key(DOC, &document.document_id),
            document.to_bytes()?,
        );
        batch.put_cf(
            owner_cf,
            pointer_key(OWNER, &[&document.creator_id, &document.document_id]),
            b"",
        );
        let sequence = self.push_outbox(
            &mut batch,
            &OutboxEntry::for_index(&document.document_id, Utc::now().timestamp_millis()),
        )?;

        self.db.write(batch)?;
        debug!(
            document_id = %document.document_id,
            outbox_seq = sequence,
            "Stored document"
        );
        Ok(())
    }

    /// Read the stored record without derived fields.
    fn load_document(&self, document_id: &str) -> Result<Option<Document>, StorageError> {
        let cf = self.cf(CF_DOCUMENTS)?;
        match self.db.get_cf(cf, record_key(DOC, document_id))? {
            Some(bytes) => Ok(Some(Document::from_bytes(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Fill in `shared` and `file_count` from share and file pointers.
    fn hydrate(&self, mut document: Document) -> Result<Document, StorageError> {
        let prefix = pointer_prefix(DOC, &[&document.document_id]);
        document.shared = self.count_prefix(CF_SHARES, &prefix)? > 0;
        document.file_count = self.count_prefix(CF_FILES, &prefix)? as usize;
        Ok(document)
    }

    /// Get a document by id.
    pub fn get_document(&self, document_id: &str) -> Result<Option<Document>, StorageError> {
        match self.load_document(document_id)? {
            Some(document) => Ok(Some(self.hydrate(document)?)),
            None => Ok(None),
        }
    }

    /// Documents a user may see: their own, those granted to them, and
    /// those reachable through the link shares they present.
    ///
    /// `created` restricts results to documents whose create date falls in
    /// the half-open range. Results are ordered by document id.
    pub fn visible_documents(
        &self,
        user_id: &str,
        share_ids: &[String],
        created: Option<&Range<DateTime<Utc>>>,
    ) -> Result<Vec<Document>, StorageError> {
        let mut candidates: BTreeMap<String, Document> = BTreeMap::new();

        if validate_segment(user_id).is_ok() {
            let owner_prefix = pointer_prefix(OWNER, &[user_id]);
            for document_id in self.pointer_targets(CF_DOCUMENTS_BY_OWNER, &owner_prefix)? {
                if let Some(document) = self.load_document(&document_id)? {
                    candidates.insert(document_id, document);
                }
            }

            let grantee_prefix = pointer_prefix(GRANTEE, &[user_id]);
            for (key, _) in self.scan_prefix(CF_SHARES, &grantee_prefix)? {
                let tail = pointer_tail(&key, &grantee_prefix)?;
                if let [document_id, _share_id] = tail.as_slice() {
                    if candidates.contains_key(document_id) {
                        continue;
                    }
                    if let Some(document) = self.load_document(document_id)? {
                        candidates.insert(document_id.clone(), document);
                    }
                }
            }
        }

        for share_id in share_ids {
            let Some(share) = self.get_share(share_id)? else {
                debug!(share_id = %share_id, "Unknown share presented");
                continue;
            };
            if share.grantee_id.is_some() {
                continue;
            }
            if candidates.contains_key(&share.document_id) {
                continue;
            }
            if let Some(document) = self.load_document(&share.document_id)? {
                candidates.insert(share.document_id, document);
            }
        }

        let mut documents = Vec::with_capacity(candidates.len());
        for document in candidates.into_values() {
            if let Some(range) = created {
                if !range.contains(&document.create_date) {
                    continue;
                }
            }
            documents.push(self.hydrate(document)?);
        }
        Ok(documents)
    }

    /// Every stored document, ordered by id (for index rebuilds).
    pub fn all_documents(&self) -> Result<Vec<Document>, StorageError> {
        let prefix = format!("{}:", DOC).into_bytes();
        let mut documents = Vec::new();
        for (_, value) in self.scan_prefix(CF_DOCUMENTS, &prefix)? {
            documents.push(self.hydrate(Document::from_bytes(&value)?)?);
        }
        Ok(documents)
    }

    /// Delete a document with its files and shares.
    ///
    /// Returns false when the document does not exist.
    pub fn delete_document(&self, document_id: &str) -> Result<bool, StorageError> {
        let docs_cf = self.cf(CF_DOCUMENTS)?;
        let owner_cf = self.cf(CF_DOCUMENTS_BY_OWNER)?;
        let files_cf = self.cf(CF_FILES)?;
        let shares_cf = self.cf(CF_SHARES)?;

        let _guard = self.lock()?;
        let Some(document) = self.load_document(document_id)? else {
            return Ok(false);
        };

        let mut batch = WriteBatch::default();
        batch.delete_cf(docs_cf, record_key(DOC, document_id));
        batch.delete_cf(
            owner_cf,
            pointer_key(OWNER, &[&document.creator_id, document_id]),
        );

        let doc_prefix = pointer_prefix(DOC, &[document_id]);
        let file_ids = self.pointer_targets(CF_FILES, &doc_prefix)?;
        for file_id in &file_ids {
            batch.delete_cf(files_cf, record_key(FILE, file_id));
            batch.delete_cf(files_cf, pointer_key(DOC, &[document_id, file_id]));
        }

        let share_ids = self.pointer_targets(CF_SHARES, &doc_prefix)?;
        for share_id in &share_ids {
            if let Some(share) = self.get_share(share_id)? {
                if let Some(grantee_id) = &share.grantee_id {
                    batch.delete_cf(
                        shares_cf,
                        pointer_key(GRANTEE, &[grantee_id, document_id, share_id]),
                    );
                }
            }
            batch.delete_cf(shares_cf, record_key(SHARE, share_id));
            batch.delete_cf(shares_cf, pointer_key(DOC, &[document_id, share_id]));
        }

        self.push_outbox(
            &mut batch,
            &OutboxEntry::for_removal(document_id, Utc::now().timestamp_millis()),
        )?;
        self.db.write(batch)?;

        info!(
            document_id = %document_id,
            files = file_ids.len(),
            shares = share_ids.len(),
            "Deleted document"
        );
        Ok(true)
    }

    // ==================== Tags ====================

    /// Store a tag, creating or replacing it.
    pub fn put_tag(&self, tag: &Tag) -> Result<(), StorageError> {
        validate_segment(&tag.tag_id)?;
        validate_segment(&tag.owner_id)?;

        let cf = self.cf(CF_TAGS)?;
        let mut batch = WriteBatch::default();
        batch.put_cf(cf, record_key(TAG, &tag.tag_id), tag.to_bytes()?);
        batch.put_cf(cf, pointer_key(OWNER, &[&tag.owner_id, &tag.tag_id]), b"");
        self.db.write(batch)?;

        debug!(tag_id = %tag.tag_id, owner_id = %tag.owner_id, "Stored tag");
        Ok(())
    }

    pub fn get_tag(&self, tag_id: &str) -> Result<Option<Tag>, StorageError> {
        let cf = self.cf(CF_TAGS)?;
        match self.db.get_cf(cf, record_key(TAG, tag_id))? {
            Some(bytes) => Ok(Some(Tag::from_bytes(&bytes)?)),
            None => Ok(None),
        }
    }

    /// All tags owned by a user, ordered by tag id.
    pub fn tags_for_owner(&self, owner_id: &str) -> Result<Vec<Tag>, StorageError> {
        if validate_segment(owner_id).is_err() {
            return Ok(Vec::new());
        }
        let prefix = pointer_prefix(OWNER, &[owner_id]);
        let mut tags = Vec::new();
        for tag_id in self.pointer_targets(CF_TAGS, &prefix)? {
            if let Some(tag) = self.get_tag(&tag_id)? {
                tags.push(tag);
            }
        }
        Ok(tags)
    }

    /// Delete a tag and detach it from its owner's documents.
    pub fn delete_tag(&self, tag_id: &str) -> Result<bool, StorageError> {
        let tags_cf = self.cf(CF_TAGS)?;
        let docs_cf = self.cf(CF_DOCUMENTS)?;

        let _guard = self.lock()?;
        let Some(tag) = self.get_tag(tag_id)? else {
            return Ok(false);
        };

        let mut batch = WriteBatch::default();
        let owner_prefix = pointer_prefix(OWNER, &[&tag.owner_id]);
        let mut detached = 0usize;
        for document_id in self.pointer_targets(CF_DOCUMENTS_BY_OWNER, &owner_prefix)? {
            if let Some(mut document) = self.load_document(&document_id)? {
                if document.tag_ids.remove(tag_id) {
                    batch.put_cf(docs_cf, record_key(DOC, &document_id), document.to_bytes()?);
                    detached += 1;
                }
            }
        }
        batch.delete_cf(tags_cf, record_key(TAG, tag_id));
        batch.delete_cf(tags_cf, pointer_key(OWNER, &[&tag.owner_id, tag_id]));
        self.db.write(batch)?;

        debug!(tag_id = %tag_id, detached, "Deleted tag");
        Ok(true)
    }

    // ==================== Shares ====================

    /// Store a share of an existing document.
    pub fn put_share(&self, share: &Share) -> Result<(), StorageError> {
        validate_segment(&share.share_id)?;
        validate_segment(&share.document_id)?;
        if let Some(grantee_id) = &share.grantee_id {
            validate_segment(grantee_id)?;
        }

        let cf = self.cf(CF_SHARES)?;
        let _guard = self.lock()?;
        if self.load_document(&share.document_id)?.is_none() {
            return Err(StorageError::NotFound(format!(
                "document {}",
                share.document_id
            )));
        }

        let mut batch = WriteBatch::default();
        batch.put_cf(cf, record_key(SHARE, &share.share_id), share.to_bytes()?);
        batch.put_cf(
            cf,
            pointer_key(DOC, &[&share.document_id, &share.share_id]),
            b"",
        );
        if let Some(grantee_id) = &share.grantee_id {
            batch.put_cf(
                cf,
                pointer_key(GRANTEE, &[grantee_id, &share.document_id, &share.share_id]),
                b"",
            );
        }
        self.db.write(batch)?;

        debug!(share_id = %share.share_id, document_id = %share.document_id, "Stored share");
        Ok(())
    }

    pub fn get_share(&self, share_id: &str) -> Result<Option<Share>, StorageError> {
        let cf = self.cf(CF_SHARES)?;
        match self.db.get_cf(cf, record_key(SHARE, share_id))? {
            Some(bytes) => Ok(Some(Share::from_bytes(&bytes)?)),
            None => Ok(None),
        }
    }

    pub fn shares_for_document(&self, document_id: &str) -> Result<Vec<Share>, StorageError> {
        let prefix = pointer_prefix(DOC, &[document_id]);
        let mut shares = Vec::new();
        for share_id in self.pointer_targets(CF_SHARES, &prefix)? {
            if let Some(share) = self.get_share(&share_id)? {
                shares.push(share);
            }
        }
        Ok(shares)
    }

    pub fn delete_share(&self, share_id: &str) -> Result<bool, StorageError> {
        let cf = self.cf(CF_SHARES)?;
        let _guard = self.lock()?;
        let Some(share) = self.get_share(share_id)? else {
            return Ok(false);
        };

        let mut batch = WriteBatch::default();
        batch.delete_cf(cf, record_key(SHARE, share_id));
        batch.delete_cf(cf, pointer_key(DOC, &[&share.document_id, share_id]));
        if let Some(grantee_id) = &share.grantee_id {
            batch.delete_cf(
                cf,
                pointer_key(GRANTEE, &[grantee_id, &share.document_id, share_id]),
            );
        }
        self.db.write(batch)?;

        debug!(share_id = %share_id, "Deleted share");
        Ok(true)
    }

    // ==================== Files ====================

    /// Attach a file to an existing document.
    ///
    /// The file's text changes the document's full content, so an index
    /// outbox entry for the document is written with it.
    pub fn put_file(&self, file: &StoredFile) -> Result<(), StorageError> {
        validate_segment(&file.file_id)?;
        validate_segment(&file.document_id)?;

        let cf = self.cf(CF_FILES)?;
        let _guard = self.lock()?;
        if self.load_document(&file.document_id)?.is_none() {
            return Err(StorageError::NotFound(format!(
                "document {}",
                file.document_id
            )));
        }

        let mut batch = WriteBatch::default();
        batch.put_cf(cf, record_key(FILE, &file.file_id), file.to_bytes()?);
        batch.put_cf(cf, pointer_key(DOC, &[&file.document_id, &file.file_id]), b"");
        self.push_outbox(
            &mut batch,
            &OutboxEntry::for_index(&file.document_id, Utc::now().timestamp_millis()),
        )?;
        self.db.write(batch)?;

        debug!(file_id = %file.file_id, document_id = %file.document_id, "Stored file");
        Ok(())
    }

    pub fn get_file(&self, file_id: &str) -> Result<Option<StoredFile>, StorageError> {
        let cf = self.cf(CF_FILES)?;
        match self.db.get_cf(cf, record_key(FILE, file_id))? {
            Some(bytes) => Ok(Some(StoredFile::from_bytes(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Files of a document, ordered by file id (ULIDs: upload order).
    pub fn files_for_document(&self, document_id: &str) -> Result<Vec<StoredFile>, StorageError> {
        let prefix = pointer_prefix(DOC, &[document_id]);
        let mut files = Vec::new();
        for file_id in self.pointer_targets(CF_FILES, &prefix)? {
            if let Some(file) = self.get_file(&file_id)? {
                files.push(file);
            }
        }
        Ok(files)
    }

    pub fn delete_file(&self, file_id: &str) -> Result<bool, StorageError> {
        let cf = self.cf(CF_FILES)?;
        let _guard = self.lock()?;
        let Some(file) = self.get_file(file_id)? else {
            return Ok(false);
        };

        let mut batch = WriteBatch::default();
        batch.delete_cf(cf, record_key(FILE, file_id));
        batch.delete_cf(cf, pointer_key(DOC, &[&file.document_id, file_id]));
        self.push_outbox(
            &mut batch,
            &OutboxEntry::for_index(&file.document_id, Utc::now().timestamp_millis()),
        )?;
        self.db.write(batch)?;

        debug!(file_id = %file_id, document_id = %file.document_id, "Deleted file");
        Ok(true)
    }

    // ==================== Checkpoints ====================

    pub fn put_checkpoint(&self, name: &str, checkpoint_bytes: &[u8]) -> Result<(), StorageError> {
        let cf = self.cf(CF_CHECKPOINTS)?;
        let key = CheckpointKey::new(name);
        self.db.put_cf(cf, key.to_bytes(), checkpoint_bytes)?;
        Ok(())
    }

    pub fn get_checkpoint(&self, name: &str) -> Result<Option<Vec<u8>>, StorageError> {
        let cf = self.cf(CF_CHECKPOINTS)?;
        let key = CheckpointKey::new(name);
        let result = self.db.get_cf(cf, key.to_bytes())?;
        Ok(result)
    }

    // ==================== Outbox ====================

    /// Get outbox entries starting from a sequence number.
    ///
    /// Returns Vec of (sequence, entry) tuples in sequence order.
    pub fn get_outbox_entries(
        &self,
        start_sequence: u64,
        limit: usize,
    ) -> Result<Vec<(u64, OutboxEntry)>, StorageError> {
        let cf = self.cf(CF_OUTBOX)?;

        let start_key = OutboxKey::new(start_sequence);
        let iter = self.db.iterator_cf(
            cf,
            IteratorMode::From(&start_key.to_bytes(), Direction::Forward),
        );

        let mut results = Vec::new();
        for item in iter.take(limit) {
            let (key, value) = item?;
            let outbox_key = OutboxKey::from_bytes(&key)?;
            let entry = OutboxEntry::from_bytes(&value)?;
            results.push((outbox_key.sequence, entry));
        }

        Ok(results)
    }

    /// Delete outbox entries up to and including a sequence number.
    ///
    /// Returns count of deleted entries.
    pub fn delete_outbox_entries(&self, up_to_sequence: u64) -> Result<usize, StorageError> {
        let cf = self.cf(CF_OUTBOX)?;

        let iter = self.db.iterator_cf(cf, IteratorMode::Start);
        let mut batch = WriteBatch::default();
        let mut count = 0;

        for item in iter {
            let (key, _) = item?;
            let outbox_key = OutboxKey::from_bytes(&key)?;

            if outbox_key.sequence > up_to_sequence {
                break;
            }

            batch.delete_cf(cf, &key);
            count += 1;
        }

        if count > 0 {
            self.db.write(batch)?;
            debug!(count, up_to_sequence, "Deleted outbox entries");
        }

        Ok(count)
    }

    // ==================== Admin ====================

    /// Flush all column families to disk
    pub fn flush(&self) -> Result<(), StorageError> {
        for cf_name in ALL_CF_NAMES {
            if let Some(cf) = self.db.cf_handle(cf_name) {
                self.db.flush_cf(cf)?;
            }
        }
        Ok(())
    }

    /// Trigger manual compaction on all column families.
    pub fn compact(&self) -> Result<(), StorageError> {
        info!("Starting full compaction...");
        for cf_name in ALL_CF_NAMES {
            if let Some(cf) = self.db.cf_handle(cf_name) {
                self.db.compact_range_cf::<&[u8], &[u8]>(cf, None, None);
            }
        }
        info!("Compaction complete");
        Ok(())
    }

    /// Get database statistics.
    pub fn get_stats(&self) -> Result<StorageStats, StorageError> {
        Ok(StorageStats {
            document_count: self.count_prefix(CF_DOCUMENTS, format!("{}:", DOC).as_bytes())?,
            tag_count: self.count_prefix(CF_TAGS, format!("{}:", TAG).as_bytes())?,
            share_count: self.count_prefix(CF_SHARES, format!("{}:", SHARE).as_bytes())?,
            file_count: self.count_prefix(CF_FILES, format!("{}:", FILE).as_bytes())?,
            outbox_count: self.count_prefix(CF_OUTBOX, b"outbox:")?,
            disk_usage_bytes: self.get_disk_usage(),
        })
    }

    fn get_disk_usage(&self) -> u64 {
        let mut total_size = 0u64;
        if let Ok(entries) = std::fs::read_dir(self.db.path()) {
            for entry in entries.flatten() {
                if let Ok(metadata) = entry.metadata() {
                    total_size += metadata.len();
                }
            }
        }
        total_size
    }
}

/// Statistics about the storage.
#[derive(Debug, Default)]
pub struct StorageStats {
    pub document_count: u64,
    pub tag_count: u64,
    pub share_count: u64,
    pub file_count: u64,
    /// Number of pending outbox entries
    pub outbox_count: u64,
    /// Total disk usage in bytes
    pub disk_usage_bytes: u64,
}

//! The document service and its synchronous indexing hook.

use std::sync::{Arc, Mutex, MutexGuard};

use serde::Serialize;
use tracing::{debug, info};

use docvault_indexing::{
    rebuild_text_index, IndexingPipeline, LoggingProgressCallback, PipelineConfig,
    ProcessResult, RebuildConfig, RebuildProgress, TextIndexUpdater,
};
use docvault_query::{SearchExecutor, Viewer};
use docvault_search::{DocumentSearcher, SearchIndex, SearchIndexConfig, SearchIndexer};
use docvault_storage::Storage;
use docvault_types::{Document, DocumentList, PageRequest, Settings, SortSpec};

use crate::error::ServiceError;

/// Upper bound on outbox batches drained per mutation.
const MAX_DRAIN_BATCHES: usize = 10_000;

/// Counts reported by the admin stats command.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ServiceStats {
    pub documents: u64,
    pub tags: u64,
    pub shares: u64,
    pub files: u64,
    pub pending_outbox: u64,
    pub indexed_documents: u64,
    pub disk_usage_bytes: u64,
}

/// Document repository backed by RocksDB and a Tantivy text index.
///
/// Every mutation writes its outbox entry atomically with the record and
/// then drains the outbox before returning, so a search issued after a
/// mutation returns observes it.
pub struct DocumentService {
    pub(crate) storage: Arc<Storage>,
    indexer: Arc<SearchIndexer>,
    searcher: Arc<DocumentSearcher>,
    pipeline: Mutex<IndexingPipeline>,
    executor: SearchExecutor<Storage, DocumentSearcher>,
}

impl DocumentService {
    /// Open the stores named by the settings.
    pub fn open(settings: &Settings) -> Result<Self, ServiceError> {
        settings.validate()?;
        let storage = Arc::new(Storage::open(&settings.expanded_db_path())?);
        let index = SearchIndex::open_or_create(
            SearchIndexConfig::new(settings.expanded_search_index_path())
                .with_memory_mb(settings.index_writer_memory_mb),
        )?;
        Self::new(storage, &index, settings)
    }

    /// Build the service over already opened stores.
    ///
    /// Outbox entries left behind by an interrupted run are applied here.
    pub fn new(
        storage: Arc<Storage>,
        index: &SearchIndex,
        settings: &Settings,
    ) -> Result<Self, ServiceError> {
        let indexer = Arc::new(SearchIndexer::new(index)?);
        let searcher = Arc::new(DocumentSearcher::new(index)?);

        let mut pipeline = IndexingPipeline::new(storage.clone(), PipelineConfig::default());
        pipeline.add_updater(Box::new(TextIndexUpdater::new(
            indexer.clone(),
            storage.clone(),
        )));
        pipeline.load_checkpoints()?;

        let executor = SearchExecutor::new(storage.clone(), searcher.clone())
            .with_page_sizes(settings.default_page_size, settings.max_page_size);

        let service = Self {
            storage,
            indexer,
            searcher,
            pipeline: Mutex::new(pipeline),
            executor,
        };
        let recovered = service.sync_index()?;
        if recovered.total_processed > 0 {
            info!(
                entries = recovered.total_processed,
                "Applied pending index updates"
            );
        }
        Ok(service)
    }

    fn lock_pipeline(&self) -> Result<MutexGuard<'_, IndexingPipeline>, ServiceError> {
        self.pipeline
            .lock()
            .map_err(|e| ServiceError::Lock(e.to_string()))
    }

    /// Drain the outbox into the text index and make the result searchable.
    pub fn sync_index(&self) -> Result<ProcessResult, ServiceError> {
        let mut pipeline = self.lock_pipeline()?;
        let result = pipeline.process_until_caught_up(MAX_DRAIN_BATCHES)?;
        pipeline.cleanup_outbox()?;
        if result.committed {
            self.searcher.reload()?;
        }
        debug!(processed = result.total_processed, "Index synchronized");
        Ok(result)
    }

    /// Search the documents visible to a viewer.
    pub fn search(
        &self,
        viewer: &Viewer,
        query: &str,
        sort: SortSpec,
        page: PageRequest,
    ) -> Result<DocumentList, ServiceError> {
        Ok(self.executor.search(viewer, query, sort, page)?)
    }

    /// The plain listing: every visible document, sorted and paged.
    pub fn list_documents(
        &self,
        viewer: &Viewer,
        sort: SortSpec,
        page: PageRequest,
    ) -> Result<DocumentList, ServiceError> {
        self.search(viewer, "", sort, page)
    }

    /// Rebuild the text index from storage.
    pub fn rebuild_index(&self) -> Result<RebuildProgress, ServiceError> {
        // Holding the pipeline keeps drains from interleaving with the rebuild
        let _pipeline = self.lock_pipeline()?;
        let progress = rebuild_text_index(
            &self.storage,
            &self.indexer,
            &RebuildConfig::default().with_continue_on_error(true),
            &LoggingProgressCallback,
        )?;
        self.searcher.reload()?;
        Ok(progress)
    }

    pub fn stats(&self) -> Result<ServiceStats, ServiceError> {
        let storage = self.storage.get_stats()?;
        Ok(ServiceStats {
            documents: storage.document_count,
            tags: storage.tag_count,
            shares: storage.share_count,
            files: storage.file_count,
            pending_outbox: storage.outbox_count,
            indexed_documents: self.searcher.num_docs(),
            disk_usage_bytes: storage.disk_usage_bytes,
        })
    }

    /// Flush and compact the metadata store.
    pub fn compact(&self) -> Result<(), ServiceError> {
        self.storage.flush()?;
        self.storage.compact()?;
        Ok(())
    }

    /// Load a document the caller created.
    pub(crate) fn owned_document(
        &self,
        user_id: &str,
        document_id: &str,
    ) -> Result<Document, ServiceError> {
        let document = self
            .storage
            .get_document(document_id)?
            .ok_or_else(|| ServiceError::NotFound(format!("document {}", document_id)))?;
        if document.creator_id != user_id {
            if self.can_view(&Viewer::new(user_id), &document)? {
                return Err(ServiceError::Forbidden(format!(
                    "document {} belongs to another user",
                    document_id
                )));
            }
            return Err(ServiceError::NotFound(format!("document {}", document_id)));
        }
        Ok(document)
    }

    /// Whether the viewer created the document or holds a share on it.
    pub(crate) fn can_view(
        &self,
        viewer: &Viewer,
        document: &Document,
    ) -> Result<bool, ServiceError> {
        if viewer.is_anonymous() {
            return Ok(false);
        }
        if document.creator_id == viewer.user_id {
            return Ok(true);
        }
        let shares = self.storage.shares_for_document(&document.document_id)?;
        Ok(shares.iter().any(|share| match &share.grantee_id {
            Some(grantee) => *grantee == viewer.user_id,
            None => viewer.share_ids.contains(&share.share_id),
        }))
    }
}

//! Search execution.
//!
//! Order of evaluation: visibility and the created-date window (one
//! catalog read), per-document facets, text matching, sorting, paging,
//! then tag resolution for the returned page only.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use docvault_types::{
    Document, DocumentList, DocumentSummary, PageRequest, SortColumn, SortOrder, SortSpec, Tag,
    TagSummary,
};

use crate::catalog::{DocumentCatalog, TextIndex};
use crate::error::QueryError;
use crate::facets::FacetEvaluator;
use crate::parser::ParsedQuery;
use crate::viewer::Viewer;

pub const DEFAULT_PAGE_SIZE: usize = 10;
pub const MAX_PAGE_SIZE: usize = 100;

/// Runs parsed queries against a catalog and a text index.
///
/// Stateless between calls; share it behind an `Arc` for concurrent searches.
pub struct SearchExecutor<C, T> {
    catalog: Arc<C>,
    index: Arc<T>,
    default_page_size: usize,
    max_page_size: usize,
}

impl<C: DocumentCatalog, T: TextIndex> SearchExecutor<C, T> {
    pub fn new(catalog: Arc<C>, index: Arc<T>) -> Self {
        Self {
            catalog,
            index,
            default_page_size: DEFAULT_PAGE_SIZE,
            max_page_size: MAX_PAGE_SIZE,
        }
    }

    pub fn with_page_sizes(mut self, default_page_size: usize, max_page_size: usize) -> Self {
        self.default_page_size = default_page_size;
        self.max_page_size = max_page_size;
        self
    }

    /// Parse and execute a raw query string.
    pub fn search(
        &self,
        viewer: &Viewer,
        raw_query: &str,
        sort: SortSpec,
        page: PageRequest,
    ) -> Result<DocumentList, QueryError> {
        self.execute(viewer, &ParsedQuery::parse_str(raw_query), sort, page)
    }

    /// Execute a parsed query for a viewer.
    pub fn execute(
        &self,
        viewer: &Viewer,
        query: &ParsedQuery,
        sort: SortSpec,
        page: PageRequest,
    ) -> Result<DocumentList, QueryError> {
        if viewer.is_anonymous() {
            debug!("Search without user, returning nothing");
            return Ok(DocumentList::empty());
        }

        let user_tags = self.catalog.tags_for_owner(&viewer.user_id)?;
        let facets = FacetEvaluator::compile(&query.facets, &user_tags);
        if facets.is_unsatisfiable() {
            debug!(user_id = %viewer.user_id, "Facets exclude every document");
            return Ok(DocumentList::empty());
        }

        let window = facets.window.as_range();
        let mut candidates = self.catalog.visible_documents(viewer, window.as_ref())?;
        let visible = candidates.len();
        candidates.retain(|document| facets.matches(document));

        let scores = if query.has_terms() && !candidates.is_empty() {
            self.index
                .match_terms(&query.metadata_terms, &query.full_content_terms)?
        } else {
            None
        };
        if let Some(scores) = &scores {
            candidates.retain(|document| scores.contains_key(&document.document_id));
        }

        let relevance = scores.unwrap_or_default();
        sort_documents(&mut candidates, sort, &relevance);

        let total = candidates.len();
        let limit = page.effective_limit(self.default_page_size, self.max_page_size);
        let page_documents: Vec<Document> = candidates
            .into_iter()
            .skip(page.offset)
            .take(limit)
            .collect();

        let mut tag_cache: HashMap<String, Option<Tag>> = user_tags
            .into_iter()
            .map(|tag| (tag.tag_id.clone(), Some(tag)))
            .collect();
        let mut documents = Vec::with_capacity(page_documents.len());
        for document in &page_documents {
            let tags = self.resolve_tags(document, &mut tag_cache)?;
            documents.push(DocumentSummary::from_document(document, tags));
        }

        debug!(
            user_id = %viewer.user_id,
            visible,
            total,
            returned = documents.len(),
            "Search complete"
        );
        Ok(DocumentList { documents, total })
    }

    /// Resolve a document's tag ids, skipping tags that no longer exist.
    fn resolve_tags(
        &self,
        document: &Document,
        cache: &mut HashMap<String, Option<Tag>>,
    ) -> Result<Vec<TagSummary>, QueryError> {
        let mut tags = Vec::with_capacity(document.tag_ids.len());
        for tag_id in &document.tag_ids {
            if !cache.contains_key(tag_id) {
                let tag = self.catalog.get_tag(tag_id)?;
                cache.insert(tag_id.clone(), tag);
            }
            if let Some(Some(tag)) = cache.get(tag_id) {
                tags.push(TagSummary::from(tag));
            }
        }
        tags.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        Ok(tags)
    }
}

/// Sort by the requested column; ties are broken by ascending document id.
fn sort_documents(documents: &mut [Document], sort: SortSpec, relevance: &HashMap<String, f32>) {
    documents.sort_by(|a, b| {
        let primary = compare_column(a, b, sort.column, relevance);
        let primary = match sort.order {
            SortOrder::Ascending => primary,
            SortOrder::Descending => primary.reverse(),
        };
        primary.then_with(|| a.document_id.cmp(&b.document_id))
    });
}

fn compare_column(
    a: &Document,
    b: &Document,
    column: SortColumn,
    relevance: &HashMap<String, f32>,
) -> Ordering {
    match column {
        SortColumn::Title => a.title.to_lowercase().cmp(&b.title.to_lowercase()),
        SortColumn::Description => {
            let key = |d: &Document| d.description.as_deref().map(str::to_lowercase);
            key(a).cmp(&key(b))
        }
        SortColumn::Language => a.language.cmp(&b.language),
        SortColumn::CreateDate => a.create_date.cmp(&b.create_date),
        SortColumn::Shared => a.shared.cmp(&b.shared),
        SortColumn::FileCount => a.file_count.cmp(&b.file_count),
        SortColumn::Relevance => {
            let score = |d: &Document| relevance.get(&d.document_id).copied();
            match (score(a), score(b)) {
                (Some(x), Some(y)) => x.total_cmp(&y),
                (Some(_), None) => Ordering::Greater,
                (None, Some(_)) => Ordering::Less,
                (None, None) => Ordering::Equal,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ops::Range;

    use chrono::{DateTime, TimeZone, Utc};

    /// In-memory catalog mirroring the visibility rules of the store.
    #[derive(Default)]
    struct MemoryCatalog {
        documents: Vec<Document>,
        /// (document_id, grantee)
        grants: Vec<(String, String)>,
        /// (share_id, document_id)
        links: Vec<(String, String)>,
        tags: Vec<Tag>,
    }

    impl DocumentCatalog for MemoryCatalog {
        fn visible_documents(
            &self,
            viewer: &Viewer,
            created: Option<&Range<DateTime<Utc>>>,
        ) -> Result<Vec<Document>, QueryError> {
            Ok(self
                .documents
                .iter()
                .filter(|d| {
                    d.creator_id == viewer.user_id
                        || self
                            .grants
                            .iter()
                            .any(|(doc, user)| *doc == d.document_id && *user == viewer.user_id)
                        || self.links.iter().any(|(share, doc)| {
                            *doc == d.document_id && viewer.share_ids.contains(share)
                        })
                })
                .filter(|d| created.is_none_or(|range| range.contains(&d.create_date)))
                .cloned()
                .collect())
        }

        fn tags_for_owner(&self, owner_id: &str) -> Result<Vec<Tag>, QueryError> {
            Ok(self
                .tags
                .iter()
                .filter(|t| t.owner_id == owner_id)
                .cloned()
                .collect())
        }

        fn get_tag(&self, tag_id: &str) -> Result<Option<Tag>, QueryError> {
            Ok(self.tags.iter().find(|t| t.tag_id == tag_id).cloned())
        }
    }

    /// Matches a term when it occurs as a lowercase word.
    #[derive(Default)]
    struct MemoryIndex {
        /// document_id -> (metadata, content)
        entries: HashMap<String, (String, String)>,
    }

    impl MemoryIndex {
        fn has_word(text: &str, term: &str) -> bool {
            text.to_lowercase()
                .split_whitespace()
                .any(|w| w == term.to_lowercase())
        }
    }

    impl TextIndex for MemoryIndex {
        fn match_terms(
            &self,
            any_scope_terms: &[String],
            content_terms: &[String],
        ) -> Result<Option<HashMap<String, f32>>, QueryError> {
            if any_scope_terms.is_empty() && content_terms.is_empty() {
                return Ok(None);
            }
            Ok(Some(
                self.entries
                    .iter()
                    .filter(|(_, (metadata, content))| {
                        any_scope_terms.iter().all(|t| {
                            Self::has_word(metadata, t) || Self::has_word(content, t)
                        }) && content_terms.iter().all(|t| Self::has_word(content, t))
                    })
                    .map(|(id, (metadata, _))| (id.clone(), metadata.len() as f32))
                    .collect(),
            ))
        }
    }

    fn utc(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
    }

    fn doc(id: &str, owner: &str, title: &str, created: DateTime<Utc>) -> Document {
        Document::with_id(id, owner, title).with_create_date(created)
    }

    fn executor(
        catalog: MemoryCatalog,
        index: MemoryIndex,
    ) -> SearchExecutor<MemoryCatalog, MemoryIndex> {
        SearchExecutor::new(Arc::new(catalog), Arc::new(index))
    }

    fn ids(list: &DocumentList) -> Vec<&str> {
        list.documents.iter().map(|d| d.id.as_str()).collect()
    }

    fn search(
        executor: &SearchExecutor<MemoryCatalog, MemoryIndex>,
        viewer: &Viewer,
        raw: &str,
    ) -> DocumentList {
        executor
            .search(viewer, raw, SortSpec::default(), PageRequest::default())
            .unwrap()
    }

    #[test]
    fn test_visibility_isolation() {
        let catalog = MemoryCatalog {
            documents: vec![
                doc("a1", "alice", "Alpha", utc(2020, 1, 1)),
                doc("b1", "bob", "Beta", utc(2020, 1, 1)),
            ],
            ..Default::default()
        };
        let executor = executor(catalog, MemoryIndex::default());

        assert_eq!(ids(&search(&executor, &Viewer::new("alice"), "")), vec!["a1"]);
        assert_eq!(ids(&search(&executor, &Viewer::new("bob"), "")), vec!["b1"]);
        assert_eq!(search(&executor, &Viewer::new("carol"), "").total, 0);
        assert_eq!(search(&executor, &Viewer::new(""), "").total, 0);
    }

    #[test]
    fn test_shares_extend_visibility() {
        let catalog = MemoryCatalog {
            documents: vec![
                doc("a1", "alice", "Alpha", utc(2020, 1, 1)),
                doc("a2", "alice", "Alpha two", utc(2020, 1, 2)),
            ],
            grants: vec![("a1".to_string(), "bob".to_string())],
            links: vec![("link-1".to_string(), "a2".to_string())],
            ..Default::default()
        };
        let executor = executor(catalog, MemoryIndex::default());

        assert_eq!(ids(&search(&executor, &Viewer::new("bob"), "")), vec!["a1"]);
        let with_link = Viewer::new("bob").with_share("link-1");
        assert_eq!(ids(&search(&executor, &with_link, "")), vec!["a2", "a1"]);
    }

    #[test]
    fn test_terms_are_and_combined_across_scopes() {
        let catalog = MemoryCatalog {
            documents: vec![
                doc("d1", "alice", "super title", utc(2020, 1, 1)),
                doc("d2", "alice", "plain title", utc(2020, 1, 2)),
            ],
            ..Default::default()
        };
        let mut index = MemoryIndex::default();
        index.entries.insert(
            "d1".to_string(),
            ("super title".to_string(), "uranium".to_string()),
        );
        index.entries.insert(
            "d2".to_string(),
            ("plain title".to_string(), "einstein".to_string()),
        );
        let executor = executor(catalog, index);
        let alice = Viewer::new("alice");

        assert_eq!(search(&executor, &alice, "title").total, 2);
        assert_eq!(ids(&search(&executor, &alice, "super title")), vec!["d1"]);
        assert_eq!(ids(&search(&executor, &alice, "uranium")), vec!["d1"]);
        assert_eq!(search(&executor, &alice, "super einstein").total, 0);
        assert_eq!(search(&executor, &alice, "full:title").total, 0);
        assert_eq!(
            ids(&search(&executor, &alice, "title full:einstein")),
            vec!["d2"]
        );
    }

    #[test]
    fn test_facets_are_conjunctive() {
        let tag = Tag::new("alice", "SuperTag", "#ffff00");
        let mut shared = doc("d1", "alice", "One", utc(2020, 1, 1))
            .with_language("fra")
            .with_tags([tag.tag_id.clone()]);
        shared.shared = true;
        let plain = doc("d2", "alice", "Two", utc(2020, 1, 1)).with_tags([tag.tag_id.clone()]);
        let catalog = MemoryCatalog {
            documents: vec![shared, plain],
            tags: vec![tag],
            ..Default::default()
        };
        let executor = executor(catalog, MemoryIndex::default());
        let alice = Viewer::new("alice");

        assert_eq!(search(&executor, &alice, "tag:super").total, 2);
        assert_eq!(ids(&search(&executor, &alice, "tag:super shared:yes")), vec!["d1"]);
        assert_eq!(ids(&search(&executor, &alice, "tag:super lang:eng")), vec!["d2"]);
        assert_eq!(search(&executor, &alice, "shared:yes lang:eng").total, 0);
        assert_eq!(search(&executor, &alice, "tag:Nop").total, 0);
    }

    #[test]
    fn test_date_facets() {
        let catalog = MemoryCatalog {
            documents: vec![
                doc("d2011", "alice", "Old", utc(2011, 5, 20)),
                doc("d2030", "alice", "New", utc(2030, 7, 1)),
            ],
            ..Default::default()
        };
        let executor = executor(catalog, MemoryIndex::default());
        let alice = Viewer::new("alice");

        assert_eq!(ids(&search(&executor, &alice, "at:2011")), vec!["d2011"]);
        assert_eq!(
            ids(&search(&executor, &alice, "after:2010 before:2011-05-20")),
            vec!["d2011"]
        );
        assert_eq!(ids(&search(&executor, &alice, "after:2012")), vec!["d2030"]);
        assert_eq!(search(&executor, &alice, "at:2040-05-35").total, 0);
        assert_eq!(search(&executor, &alice, "after:2010-18").total, 0);
        assert_eq!(search(&executor, &alice, "before:2040-05-38").total, 0);
    }

    #[test]
    fn test_sorting_and_tie_break() {
        let same_day = utc(2020, 1, 1);
        let mut many_files = doc("c", "alice", "beta", same_day);
        many_files.file_count = 3;
        let catalog = MemoryCatalog {
            documents: vec![
                many_files,
                doc("a", "alice", "Alpha", same_day),
                doc("b", "alice", "alpha", same_day),
            ],
            ..Default::default()
        };
        let executor = executor(catalog, MemoryIndex::default());
        let alice = Viewer::new("alice");
        let list = |column, order| {
            executor
                .search(&alice, "", SortSpec::new(column, order), PageRequest::default())
                .unwrap()
        };

        assert_eq!(
            ids(&list(SortColumn::Title, SortOrder::Ascending)),
            vec!["a", "b", "c"]
        );
        assert_eq!(
            ids(&list(SortColumn::Title, SortOrder::Descending)),
            vec!["c", "a", "b"]
        );
        assert_eq!(
            ids(&list(SortColumn::CreateDate, SortOrder::Descending)),
            vec!["a", "b", "c"]
        );
        assert_eq!(
            ids(&list(SortColumn::FileCount, SortOrder::Descending)),
            vec!["c", "a", "b"]
        );
    }

    #[test]
    fn test_relevance_sort() {
        let catalog = MemoryCatalog {
            documents: vec![
                doc("short", "alice", "x", utc(2020, 1, 1)),
                doc("long", "alice", "x", utc(2020, 1, 2)),
            ],
            ..Default::default()
        };
        let mut index = MemoryIndex::default();
        index
            .entries
            .insert("short".to_string(), ("rust".to_string(), String::new()));
        index.entries.insert(
            "long".to_string(),
            ("rust and more words".to_string(), String::new()),
        );
        let executor = executor(catalog, index);

        let list = executor
            .search(
                &Viewer::new("alice"),
                "rust",
                SortSpec::new(SortColumn::Relevance, SortOrder::Descending),
                PageRequest::default(),
            )
            .unwrap();
        assert_eq!(ids(&list), vec!["long", "short"]);
    }

    #[test]
    fn test_paging_after_sorting() {
        let documents = (0..25)
            .map(|i| doc(&format!("d{:02}", i), "alice", "T", utc(2020, 1, 1 + i as u32)))
            .collect();
        let catalog = MemoryCatalog {
            documents,
            ..Default::default()
        };
        let executor = executor(catalog, MemoryIndex::default()).with_page_sizes(10, 20);
        let alice = Viewer::new("alice");
        let sort = SortSpec::new(SortColumn::CreateDate, SortOrder::Ascending);

        let first = executor.search(&alice, "", sort, PageRequest::default()).unwrap();
        assert_eq!(first.total, 25);
        assert_eq!(first.documents.len(), 10);
        assert_eq!(first.documents[0].id, "d00");

        let last = executor.search(&alice, "", sort, PageRequest::new(20, 10)).unwrap();
        assert_eq!(ids(&last), vec!["d20", "d21", "d22", "d23", "d24"]);

        let clamped = executor.search(&alice, "", sort, PageRequest::new(0, 500)).unwrap();
        assert_eq!(clamped.documents.len(), 20);

        let beyond = executor.search(&alice, "", sort, PageRequest::new(100, 10)).unwrap();
        assert_eq!(beyond.total, 25);
        assert!(beyond.documents.is_empty());
    }

    #[test]
    fn test_summary_resolves_owner_tags_for_shared_documents() {
        let alice_tag = Tag::new("alice", "SuperTag", "#ffff00");
        let catalog = MemoryCatalog {
            documents: vec![doc("a1", "alice", "Alpha", utc(2020, 1, 1))
                .with_tags([alice_tag.tag_id.clone(), "deleted-tag".to_string()])],
            grants: vec![("a1".to_string(), "bob".to_string())],
            tags: vec![alice_tag.clone()],
            ..Default::default()
        };
        let executor = executor(catalog, MemoryIndex::default());

        let list = search(&executor, &Viewer::new("bob"), "");
        assert_eq!(list.documents[0].tags.len(), 1);
        assert_eq!(list.documents[0].tags[0].name, "SuperTag");

        // Bob's tag facet only sees Bob's own tags
        assert_eq!(search(&executor, &Viewer::new("bob"), "tag:super").total, 0);
    }
}

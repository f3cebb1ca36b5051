//! Search over a real RocksDB store and Tantivy index.

use std::sync::Arc;

use chrono::{Datelike, TimeZone, Utc};
use tempfile::TempDir;

use docvault_query::{SearchExecutor, Viewer};
use docvault_search::{DocumentSearcher, IndexEntry, SearchIndex, SearchIndexConfig, SearchIndexer};
use docvault_storage::Storage;
use docvault_types::{Document, DocumentList, PageRequest, Share, SortSpec, StoredFile, Tag};

struct Fixture {
    _dir: TempDir,
    storage: Arc<Storage>,
    indexer: SearchIndexer,
    searcher: Arc<DocumentSearcher>,
    executor: SearchExecutor<Storage, DocumentSearcher>,
}

impl Fixture {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let storage = Arc::new(Storage::open(&dir.path().join("db")).unwrap());
        let index = SearchIndex::open_or_create(SearchIndexConfig::new(dir.path().join("index")))
            .unwrap();
        let indexer = SearchIndexer::new(&index).unwrap();
        let searcher = Arc::new(DocumentSearcher::new(&index).unwrap());
        let executor = SearchExecutor::new(storage.clone(), searcher.clone());
        Self {
            _dir: dir,
            storage,
            indexer,
            searcher,
            executor,
        }
    }

    /// Store a document and make its index entry searchable.
    fn add(&self, document: &Document) {
        self.storage.put_document(document).unwrap();
        self.reindex(&document.document_id);
    }

    fn attach(&self, document_id: &str, content: &str) {
        let file = StoredFile::new(document_id, "scan.pdf", "application/pdf").with_content(content);
        self.storage.put_file(&file).unwrap();
        self.reindex(document_id);
    }

    fn reindex(&self, document_id: &str) {
        match self.storage.get_document(document_id).unwrap() {
            Some(document) => {
                let files = self.storage.files_for_document(document_id).unwrap();
                self.indexer
                    .index_entry(&IndexEntry::from_document(&document, &files))
                    .unwrap();
            }
            None => self.indexer.delete_document(document_id).unwrap(),
        }
        self.indexer.commit().unwrap();
        self.searcher.reload().unwrap();
    }

    fn search(&self, user: &str, query: &str) -> DocumentList {
        self.executor
            .search(
                &Viewer::new(user),
                query,
                SortSpec::default(),
                PageRequest::default(),
            )
            .unwrap()
    }

    fn count(&self, user: &str, query: &str) -> usize {
        self.search(user, query).total
    }
}

/// A document created now, tagged SuperTag, shared, with "uranium" content.
fn seed_super_document(fixture: &Fixture) -> (Document, Tag) {
    let tag = Tag::new("alice", "SuperTag", "#ffff00");
    fixture.storage.put_tag(&tag).unwrap();

    let document = Document::with_id("doc-1", "alice", "My super title document 1")
        .with_description("My super description for document 1")
        .with_language("eng")
        .with_tags([tag.tag_id.clone()]);
    fixture.add(&document);
    fixture.attach("doc-1", "Einstein wrote about uranium in 1939");
    fixture
        .storage
        .put_share(&Share::link("doc-1").with_name("public"))
        .unwrap();
    (document, tag)
}

#[test]
fn test_composite_query_matches_exactly_one() {
    let fixture = Fixture::new();
    seed_super_document(&fixture);
    fixture.add(&Document::with_id("doc-2", "alice", "Unrelated note"));

    let list = fixture.search(
        "alice",
        "after:2010 before:2040-08 tag:super shared:yes lang:eng title description full:uranium",
    );
    assert_eq!(list.total, 1);
    let summary = &list.documents[0];
    assert_eq!(summary.id, "doc-1");
    assert!(summary.shared);
    assert_eq!(summary.file_count, 1);
    assert_eq!(summary.tags.len(), 1);
    assert_eq!(summary.tags[0].name, "SuperTag");
    assert_eq!(summary.tags[0].color, "#ffff00");
}

#[test]
fn test_composite_query_fails_when_one_criterion_fails() {
    let fixture = Fixture::new();
    let (document, _) = seed_super_document(&fixture);
    let composite =
        "after:2010 before:2040-08 tag:super shared:yes lang:eng title description full:uranium";
    assert_eq!(fixture.count("alice", composite), 1);

    fixture.add(&document.clone().with_language("fra"));
    assert_eq!(fixture.count("alice", composite), 0);
    assert_eq!(
        fixture.count("alice", &composite.replace("lang:eng", "lang:fra")),
        1
    );

    // Each facet, swapped for a failing variant, empties the result
    for failing in [
        "after:2010 before:2040-08 tag:super shared:no lang:fra title description full:uranium",
        "after:2010 before:2011 tag:super shared:yes lang:fra title description full:uranium",
        "after:2010 before:2040-08 tag:Nop shared:yes lang:fra title description full:uranium",
        "after:2010 before:2040-08 tag:super shared:yes lang:fra title nothing full:uranium",
        "after:2010 before:2040-08 tag:super shared:yes lang:fra title description full:plutonium",
    ] {
        assert_eq!(fixture.count("alice", failing), 0, "{}", failing);
    }
}

#[test]
fn test_date_resolver_edge_cases() {
    let fixture = Fixture::new();
    seed_super_document(&fixture);
    let year = Utc::now().year();

    assert_eq!(fixture.count("alice", "at:2040-05-35"), 0);
    assert_eq!(fixture.count("alice", "after:2010-18"), 0);
    assert_eq!(fixture.count("alice", "before:2040-05-38"), 0);
    assert_eq!(fixture.count("alice", &format!("at:{}", year)), 1);
    assert_eq!(
        fixture.count("alice", &format!("after:2010 before:{}-08", year + 5)),
        1
    );
    assert_eq!(fixture.count("alice", "before:2010"), 0);
}

#[test]
fn test_before_excludes_the_following_month() {
    let fixture = Fixture::new();
    let july = Utc.with_ymd_and_hms(2040, 7, 31, 23, 59, 59).unwrap();
    let august = Utc.with_ymd_and_hms(2040, 8, 1, 0, 0, 0).unwrap();
    let september = Utc.with_ymd_and_hms(2040, 9, 1, 0, 0, 0).unwrap();
    fixture.add(&Document::with_id("july", "alice", "July").with_create_date(july));
    fixture.add(&Document::with_id("august", "alice", "August").with_create_date(august));
    fixture.add(&Document::with_id("september", "alice", "Sept").with_create_date(september));

    let ids = |query: &str| -> Vec<String> {
        let mut ids: Vec<String> = fixture
            .search("alice", query)
            .documents
            .into_iter()
            .map(|d| d.id)
            .collect();
        ids.sort();
        ids
    };
    assert_eq!(ids("before:2040-08"), vec!["august", "july"]);
    assert_eq!(ids("before:2040-07"), vec!["july"]);
    assert_eq!(ids("at:2040-08"), vec!["august"]);
    assert_eq!(ids("after:2040-08-02"), vec!["september"]);
}

#[test]
fn test_visibility_isolation_with_matching_text() {
    let fixture = Fixture::new();
    seed_super_document(&fixture);

    assert_eq!(fixture.count("alice", "super"), 1);
    assert_eq!(fixture.count("bob", "super"), 0);
    assert_eq!(fixture.count("bob", ""), 0);
    assert_eq!(fixture.count("", "super"), 0);
}

#[test]
fn test_grants_and_links_extend_visibility() {
    let fixture = Fixture::new();
    fixture.add(&Document::with_id("granted", "alice", "quarterly report"));
    fixture.add(&Document::with_id("linked", "alice", "annual report"));
    fixture
        .storage
        .put_share(&Share::grant("granted", "bob"))
        .unwrap();
    let link = Share::link("linked");
    fixture.storage.put_share(&link).unwrap();

    assert_eq!(fixture.count("bob", "report"), 1);
    let with_link = fixture
        .executor
        .search(
            &Viewer::new("bob").with_share(link.share_id.clone()),
            "report",
            SortSpec::default(),
            PageRequest::default(),
        )
        .unwrap();
    assert_eq!(with_link.total, 2);
}

#[test]
fn test_scope_distinction() {
    let fixture = Fixture::new();
    fixture.add(&Document::with_id("meta", "alice", "uranium in the title"));
    fixture.add(&Document::with_id("content", "alice", "Scanned letter"));
    fixture.attach("content", "A letter mentioning uranium");

    assert_eq!(fixture.count("alice", "uranium"), 2);
    let full = fixture.search("alice", "full:uranium");
    assert_eq!(full.total, 1);
    assert_eq!(full.documents[0].id, "content");

    // Content alone satisfies an unprefixed term
    assert_eq!(fixture.count("alice", "letter mentioning"), 1);
    assert_eq!(fixture.count("alice", "full:title"), 0);
}

#[test]
fn test_free_terms_are_conjunctive() {
    let fixture = Fixture::new();
    fixture.add(&Document::with_id("both", "alice", "title").with_description("description"));
    fixture.add(&Document::with_id("title-only", "alice", "title"));

    assert_eq!(fixture.count("alice", "title"), 2);
    let both = fixture.search("alice", "title description");
    assert_eq!(both.total, 1);
    assert_eq!(both.documents[0].id, "both");
}

#[test]
fn test_tag_facet_substring_and_unknown() {
    let fixture = Fixture::new();
    seed_super_document(&fixture);

    assert_eq!(fixture.count("alice", "tag:super"), 1);
    assert_eq!(fixture.count("alice", "tag:TAG"), 1);
    assert_eq!(fixture.count("alice", "tag:Nop"), 0);
}

#[test]
fn test_terms_without_searchable_tokens_match_nothing() {
    let fixture = Fixture::new();
    seed_super_document(&fixture);
    fixture.add(&Document::with_id("doc-2", "alice", "Quarterly report"));
    assert_eq!(fixture.count("alice", "report"), 1);

    for query in ["!!!", "report !!!", "full:---", "full:", "&", "report full:&"] {
        assert_eq!(fixture.count("alice", query), 0, "{}", query);
    }
    assert_eq!(fixture.count("alice", "random"), 0);
}

#[test]
fn test_facets_with_empty_values() {
    let fixture = Fixture::new();
    seed_super_document(&fixture);
    fixture.add(&Document::with_id("private", "alice", "Private"));
    assert_eq!(fixture.count("alice", ""), 2);

    for query in ["at:", "after:", "before:", "tag:", "lang:", "at: super"] {
        assert_eq!(fixture.count("alice", query), 0, "{}", query);
    }
    let unshared = fixture.search("alice", "shared:");
    assert_eq!(unshared.total, 1);
    assert_eq!(unshared.documents[0].id, "private");
}

#[test]
fn test_tag_facet_uses_only_the_viewers_tags() {
    let fixture = Fixture::new();
    let (_, alice_tag) = seed_super_document(&fixture);
    fixture
        .storage
        .put_share(&Share::grant("doc-1", "bob"))
        .unwrap();

    // Bob sees the document but the tag on it belongs to alice
    assert_eq!(fixture.count("bob", "super"), 1);
    assert_eq!(fixture.count("bob", "tag:super"), 0);

    // A tag of bob's with a matching name is not on the document either
    let bob_tag = Tag::new("bob", "SuperTag", "#00ff00");
    fixture.storage.put_tag(&bob_tag).unwrap();
    assert_eq!(fixture.count("bob", "tag:super"), 0);

    let bob_doc = Document::with_id("doc-bob", "bob", "Bob's notes")
        .with_tags([bob_tag.tag_id.clone()]);
    fixture.add(&bob_doc);
    let list = fixture.search("bob", "tag:super");
    assert_eq!(list.total, 1);
    assert_eq!(list.documents[0].id, "doc-bob");

    // The shared document still shows its owner's tag in the summary
    let shared = fixture.search("bob", "super");
    assert_eq!(shared.documents[0].tags.len(), 1);
    assert_eq!(shared.documents[0].tags[0].id, alice_tag.tag_id);
    assert_eq!(fixture.count("alice", "tag:super"), 1);
}

#[test]
fn test_shared_facet_values() {
    let fixture = Fixture::new();
    seed_super_document(&fixture);
    fixture.add(&Document::with_id("private", "alice", "Private"));

    assert_eq!(fixture.count("alice", "shared:yes"), 1);
    assert_eq!(fixture.count("alice", "shared:no"), 1);
    assert_eq!(fixture.count("alice", "shared:maybe"), 1);
    assert_eq!(fixture.search("alice", "shared:maybe").documents[0].id, "private");
}

#[test]
fn test_deleted_document_is_unreachable() {
    let fixture = Fixture::new();
    seed_super_document(&fixture);
    assert_eq!(fixture.count("alice", "full:uranium"), 1);

    assert!(fixture.storage.delete_document("doc-1").unwrap());
    assert_eq!(fixture.count("alice", "full:uranium"), 0);

    fixture.reindex("doc-1");
    assert_eq!(fixture.searcher.num_docs(), 0);
    assert_eq!(fixture.count("alice", "super"), 0);
}

#[test]
fn test_concurrent_searches() {
    let fixture = Fixture::new();
    seed_super_document(&fixture);
    for i in 0..20 {
        fixture.add(&Document::with_id(format!("note-{}", i), "alice", "Plain note"));
    }

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let fixture = &fixture;
                scope.spawn(move || {
                    if i % 2 == 0 {
                        fixture.count("alice", "tag:super full:uranium")
                    } else {
                        fixture.count("alice", "note")
                    }
                })
            })
            .collect();
        for (i, handle) in handles.into_iter().enumerate() {
            let expected = if i % 2 == 0 { 1 } else { 20 };
            assert_eq!(handle.join().unwrap(), expected);
        }
    });
}

//! Scope-aware term matching over index entries.
//!
//! Every term is a required clause. A term analyzed into several tokens
//! becomes a phrase; a term analyzed into none matches nothing.

use std::collections::HashMap;

use tantivy::collector::TopDocs;
use tantivy::query::{BooleanQuery, Occur, PhraseQuery, Query, TermQuery};
use tantivy::schema::{Field, IndexRecordOption, Value};
use tantivy::tokenizer::TokenStream;
use tantivy::{Index, IndexReader, TantivyDocument, Term};
use tracing::debug;

use crate::error::SearchError;
use crate::index::SearchIndex;
use crate::schema::{SearchSchema, TextField};

/// Read side of the document index.
pub struct DocumentSearcher {
    index: Index,
    reader: IndexReader,
    schema: SearchSchema,
}

impl DocumentSearcher {
    /// Create a new searcher from a SearchIndex.
    pub fn new(index: &SearchIndex) -> Result<Self, SearchError> {
        Ok(Self {
            index: index.index().clone(),
            reader: index.reader()?,
            schema: index.schema().clone(),
        })
    }

    /// Reload the reader to see recent commits.
    pub fn reload(&self) -> Result<(), SearchError> {
        self.reader.reload()?;
        debug!("Reloaded search reader");
        Ok(())
    }

    /// Match terms against the index.
    ///
    /// `any_scope_terms` must each match the metadata or the content field;
    /// `content_terms` must each match the content field. Returns the
    /// relevance score per matching document id, or `None` when there are
    /// no terms at all.
    pub fn match_terms(
        &self,
        any_scope_terms: &[String],
        content_terms: &[String],
    ) -> Result<Option<HashMap<String, f32>>, SearchError> {
        if any_scope_terms.is_empty() && content_terms.is_empty() {
            return Ok(None);
        }
        let metadata = self.schema.text_field(TextField::Metadata);
        let content = self.schema.text_field(TextField::Content);

        let mut clauses: Vec<(Occur, Box<dyn Query>)> = Vec::new();
        for raw in any_scope_terms {
            let either: Vec<(Occur, Box<dyn Query>)> = [metadata, content]
                .into_iter()
                .filter_map(|field| self.term_query(field, raw).transpose())
                .map(|query| query.map(|q| (Occur::Should, q)))
                .collect::<Result<_, _>>()?;
            if either.is_empty() {
                debug!(term = %raw, "Term has no searchable tokens");
                return Ok(Some(HashMap::new()));
            }
            clauses.push((Occur::Must, Box::new(BooleanQuery::new(either))));
        }
        for raw in content_terms {
            match self.term_query(content, raw)? {
                Some(query) => clauses.push((Occur::Must, query)),
                None => {
                    debug!(term = %raw, "Content term has no searchable tokens");
                    return Ok(Some(HashMap::new()));
                }
            }
        }

        let searcher = self.reader.searcher();
        let limit = (self.num_docs() as usize).max(1);
        let query = BooleanQuery::new(clauses);
        let top_docs = searcher.search(&query, &TopDocs::with_limit(limit))?;

        let mut scores = HashMap::with_capacity(top_docs.len());
        for (score, doc_address) in top_docs {
            let doc: TantivyDocument = searcher.doc(doc_address)?;
            if let Some(doc_id) = doc.get_first(self.schema.doc_id).and_then(|v| v.as_str()) {
                scores.insert(doc_id.to_string(), score);
            }
        }

        debug!(
            any_scope = any_scope_terms.len(),
            content_only = content_terms.len(),
            matches = scores.len(),
            "Matched terms"
        );
        Ok(Some(scores))
    }

    /// Build the query for one raw term against one field.
    fn term_query(&self, field: Field, raw: &str) -> Result<Option<Box<dyn Query>>, SearchError> {
        let mut analyzer = self.index.tokenizer_for_field(field)?;
        let mut stream = analyzer.token_stream(raw);
        let mut terms = Vec::new();
        while let Some(token) = stream.next() {
            terms.push(Term::from_field_text(field, &token.text));
        }

        let query: Box<dyn Query> = match terms.len() {
            0 => return Ok(None),
            1 => {
                let term = terms.remove(0);
                Box::new(TermQuery::new(term, IndexRecordOption::WithFreqs))
            }
            _ => Box::new(PhraseQuery::new(terms)),
        };
        Ok(Some(query))
    }

    /// Get the number of indexed documents.
    pub fn num_docs(&self) -> u64 {
        let searcher = self.reader.searcher();
        searcher
            .segment_readers()
            .iter()
            .map(|r| r.num_docs() as u64)
            .sum()
    }
}

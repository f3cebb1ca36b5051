//! Facet evaluation.
//!
//! Date facets collapse into one created-date window that the metadata
//! store applies while loading candidates. The remaining facets become
//! per-document matchers. All facets are conjunctive.

use std::collections::HashSet;
use std::ops::Range;

use chrono::{DateTime, Utc};

use docvault_types::{Document, Tag};

use crate::date::ResolvedDateRange;
use crate::parser::FacetPredicate;

/// Intersection of all date facets of a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DateWindow {
    /// Inclusive lower bound
    pub start: Option<DateTime<Utc>>,
    /// Exclusive upper bound
    pub end: Option<DateTime<Utc>>,
    /// Set once any date facet was invalid
    pub invalid: bool,
}

impl DateWindow {
    pub fn unbounded() -> Self {
        Self::default()
    }

    fn raise_start(&mut self, start: DateTime<Utc>) {
        self.start = Some(self.start.map_or(start, |current| current.max(start)));
    }

    fn lower_end(&mut self, end: DateTime<Utc>) {
        self.end = Some(self.end.map_or(end, |current| current.min(end)));
    }

    /// Narrow the window by one date facet.
    pub fn apply(&mut self, predicate: &FacetPredicate) {
        let (range, keep_start, keep_end) = match predicate {
            FacetPredicate::CreatedAfter(range) => (range, true, false),
            FacetPredicate::CreatedBefore(range) => (range, false, true),
            FacetPredicate::CreatedAt(range) => (range, true, true),
            _ => return,
        };
        match range {
            ResolvedDateRange::Valid { start, end } => {
                if keep_start {
                    self.raise_start(*start);
                }
                if keep_end {
                    self.lower_end(*end);
                }
            }
            ResolvedDateRange::Invalid => self.invalid = true,
        }
    }

    /// Whether no instant can satisfy the window.
    pub fn is_empty(&self) -> bool {
        if self.invalid {
            return true;
        }
        match (self.start, self.end) {
            (Some(start), Some(end)) => start >= end,
            _ => false,
        }
    }

    pub fn is_unbounded(&self) -> bool {
        !self.invalid && self.start.is_none() && self.end.is_none()
    }

    pub fn contains(&self, instant: &DateTime<Utc>) -> bool {
        !self.invalid
            && self.start.is_none_or(|start| *instant >= start)
            && self.end.is_none_or(|end| *instant < end)
    }

    /// The window as a range for the metadata store; None when unbounded.
    pub fn as_range(&self) -> Option<Range<DateTime<Utc>>> {
        if self.is_unbounded() {
            return None;
        }
        Some(self.start.unwrap_or(DateTime::<Utc>::MIN_UTC)..self.end.unwrap_or(DateTime::<Utc>::MAX_UTC))
    }
}

/// A facet checked per candidate document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentMatcher {
    /// Document carries at least one of these tag ids
    AnyTag(HashSet<String>),
    Language(String),
    Shared(bool),
}

impl DocumentMatcher {
    pub fn matches(&self, document: &Document) -> bool {
        match self {
            DocumentMatcher::AnyTag(tag_ids) => {
                document.tag_ids.iter().any(|id| tag_ids.contains(id))
            }
            DocumentMatcher::Language(code) => document.language == *code,
            DocumentMatcher::Shared(shared) => document.shared == *shared,
        }
    }
}

/// Facets of one query compiled against the caller's tags.
#[derive(Debug, Clone, Default)]
pub struct CompiledFacets {
    pub window: DateWindow,
    pub matchers: Vec<DocumentMatcher>,
}

impl CompiledFacets {
    /// Whether a document passes every facet, date window included.
    pub fn matches(&self, document: &Document) -> bool {
        self.window.contains(&document.create_date)
            && self.matchers.iter().all(|m| m.matches(document))
    }

    /// Whether the facets exclude every document up front.
    pub fn is_unsatisfiable(&self) -> bool {
        self.window.is_empty()
            || self
                .matchers
                .iter()
                .any(|m| matches!(m, DocumentMatcher::AnyTag(ids) if ids.is_empty()))
    }
}

pub struct FacetEvaluator;

impl FacetEvaluator {
    /// Compile facets; `user_tags` are the tags the caller owns.
    pub fn compile(facets: &[FacetPredicate], user_tags: &[Tag]) -> CompiledFacets {
        let mut compiled = CompiledFacets::default();

        for facet in facets {
            match facet {
                FacetPredicate::Tag(name) => {
                    // An empty name selects no tag
                    let tag_ids = user_tags
                        .iter()
                        .filter(|tag| !name.is_empty() && tag.name_matches(name))
                        .map(|tag| tag.tag_id.clone())
                        .collect();
                    compiled.matchers.push(DocumentMatcher::AnyTag(tag_ids));
                }
                FacetPredicate::Language(code) => {
                    compiled
                        .matchers
                        .push(DocumentMatcher::Language(code.clone()));
                }
                FacetPredicate::Shared(shared) => {
                    compiled.matchers.push(DocumentMatcher::Shared(*shared));
                }
                FacetPredicate::CreatedAfter(_)
                | FacetPredicate::CreatedBefore(_)
                | FacetPredicate::CreatedAt(_) => compiled.window.apply(facet),
            }
        }

        compiled
    }
}

//! Turns tokens into a structured query.

use serde::{Deserialize, Serialize};

use crate::date::{resolve, ResolvedDateRange};
use crate::tokenizer::{tokenize, FacetKey, Token};

/// A typed structured filter from a query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "facet", content = "value")]
pub enum FacetPredicate {
    /// Document carries one of the caller's tags whose name contains this
    Tag(String),
    /// Document language equals this code
    Language(String),
    /// Document has (or has not) at least one share
    Shared(bool),
    /// Created at or after the start of the range
    CreatedAfter(ResolvedDateRange),
    /// Created before the end of the range
    CreatedBefore(ResolvedDateRange),
    /// Created within the range
    CreatedAt(ResolvedDateRange),
}

/// A parsed search query. Built per request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedQuery {
    /// Free terms matched against metadata or content
    pub metadata_terms: Vec<String>,
    /// `full:` terms matched against content only
    pub full_content_terms: Vec<String>,
    pub facets: Vec<FacetPredicate>,
}

impl ParsedQuery {
    /// Tokenize and parse a raw query string.
    pub fn parse_str(raw: &str) -> Self {
        parse(tokenize(raw))
    }

    pub fn has_terms(&self) -> bool {
        !self.metadata_terms.is_empty() || !self.full_content_terms.is_empty()
    }

    /// An empty query lists every visible document.
    pub fn is_empty(&self) -> bool {
        !self.has_terms() && self.facets.is_empty()
    }
}

/// Build a query from tokens.
///
/// A facet with an empty value is kept: empty dates resolve to
/// [`ResolvedDateRange::Invalid`], `shared:` means not shared, and empty
/// `tag:`, `lang:` and `full:` values match no document.
pub fn parse(tokens: impl IntoIterator<Item = Token>) -> ParsedQuery {
    let mut query = ParsedQuery::default();

    for token in tokens {
        let (key, value) = match token {
            Token::Term(term) => {
                query.metadata_terms.push(term);
                continue;
            }
            Token::Facet { key, value } => (key, value),
        };

        let facet = match key {
            FacetKey::Full => {
                query.full_content_terms.push(value);
                continue;
            }
            FacetKey::Tag => FacetPredicate::Tag(value),
            FacetKey::Lang => FacetPredicate::Language(value),
            FacetKey::Shared => FacetPredicate::Shared(value == "yes"),
            FacetKey::At => FacetPredicate::CreatedAt(resolve(&value)),
            FacetKey::After => FacetPredicate::CreatedAfter(resolve(&value)),
            FacetKey::Before => FacetPredicate::CreatedBefore(resolve(&value)),
        };
        query.facets.push(facet);
    }

    query
}

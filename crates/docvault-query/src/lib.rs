//! # docvault-query
//!
//! The docvault search language and its executor.
//!
//! A query is a whitespace-separated list of free terms and `key:value`
//! facets (`full`, `tag`, `lang`, `shared`, `at`, `after`, `before`). Free
//! terms match title, description or file content; `full:` terms match
//! file content only. Every term and facet must hold.
//!
//! ```ignore
//! use docvault_query::{SearchExecutor, Viewer};
//! use docvault_types::{PageRequest, SortSpec};
//!
//! let executor = SearchExecutor::new(storage, searcher);
//! let list = executor.search(
//!     &Viewer::new("alice"),
//!     "report tag:work after:2020",
//!     SortSpec::default(),
//!     PageRequest::default(),
//! )?;
//! ```

pub mod catalog;
pub mod date;
pub mod error;
pub mod executor;
pub mod facets;
pub mod parser;
pub mod tokenizer;
pub mod viewer;

pub use catalog::{DocumentCatalog, TextIndex};
pub use date::{resolve, ResolvedDateRange};
pub use error::QueryError;
pub use executor::{SearchExecutor, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
pub use facets::{CompiledFacets, DateWindow, DocumentMatcher, FacetEvaluator};
pub use parser::{parse, FacetPredicate, ParsedQuery};
pub use tokenizer::{tokenize, FacetKey, Token};
pub use viewer::Viewer;

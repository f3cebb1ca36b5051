//! Query string tokenizer.
//!
//! Splits on whitespace. A token whose text before the first `:` is a
//! known facet key becomes a facet token; anything else is free text, colon
//! included. There is no quoting or escaping.

use serde::{Deserialize, Serialize};

/// Facet prefixes recognized in a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FacetKey {
    Full,
    At,
    After,
    Before,
    Tag,
    Shared,
    Lang,
}

impl FacetKey {
    /// Look up a prefix; matching is case-sensitive.
    pub fn from_prefix(prefix: &str) -> Option<Self> {
        match prefix {
            "full" => Some(FacetKey::Full),
            "at" => Some(FacetKey::At),
            "after" => Some(FacetKey::After),
            "before" => Some(FacetKey::Before),
            "tag" => Some(FacetKey::Tag),
            "shared" => Some(FacetKey::Shared),
            "lang" => Some(FacetKey::Lang),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FacetKey::Full => "full",
            FacetKey::At => "at",
            FacetKey::After => "after",
            FacetKey::Before => "before",
            FacetKey::Tag => "tag",
            FacetKey::Shared => "shared",
            FacetKey::Lang => "lang",
        }
    }
}

impl std::fmt::Display for FacetKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One whitespace-separated piece of a query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Token {
    Term(String),
    Facet { key: FacetKey, value: String },
}

/// Tokenize a raw query string.
pub fn tokenize(raw: &str) -> Vec<Token> {
    raw.split_whitespace().map(classify).collect()
}

fn classify(piece: &str) -> Token {
    if let Some((prefix, value)) = piece.split_once(':') {
        if let Some(key) = FacetKey::from_prefix(prefix) {
            return Token::Facet {
                key,
                value: value.to_string(),
            };
        }
    }
    Token::Term(piece.to_string())
}

//! Request types for search engine operations.

use serde_json::Value;

/// A single document to write, addressed by its own id.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexDocumentRequest {
    /// The document id within the index.
    pub id: String,
    /// The document body, written as-is.
    pub body: Value,
}

impl IndexDocumentRequest {
    pub fn new(id: impl Into<String>, body: Value) -> Self {
        Self {
            id: id.into(),
            body,
        }
    }
}

/// A full-text match query over one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchQuery {
    /// The field to match against.
    pub field: String,
    /// The text to match.
    pub text: String,
    /// Maximum number of hits to return.
    pub size: usize,
}

impl MatchQuery {
    pub fn new(field: impl Into<String>, text: impl Into<String>, size: usize) -> Self {
        Self {
            field: field.into(),
            text: text.into(),
            size,
        }
    }
}

//! Error types for index bootstrap and loading.

use truck_search_repository::SearchError;
use thiserror::Error;

/// Errors that can occur while getting the search index ready.
///
/// None of these are recovered from: every one of them aborts startup.
#[derive(Error, Debug)]
pub enum IngestError {
    /// Fetching or decoding the dataset failed.
    #[error("Source error: {0}")]
    SourceError(String),

    /// The dataset was fetched but could not be turned into documents.
    #[error("Loader error: {0}")]
    LoaderError(String),

    /// Error from the search engine.
    #[error("Search error: {0}")]
    SearchError(#[from] SearchError),

    /// The search engine stayed unreachable for the whole retry budget.
    #[error("Search engine unreachable after {attempts} attempts")]
    RetriesExhausted { attempts: u32 },

    /// Bootstrap was cancelled while waiting to retry.
    #[error("Bootstrap cancelled")]
    Cancelled,
}

impl IngestError {
    /// Create a source error.
    pub fn source(msg: impl Into<String>) -> Self {
        Self::SourceError(msg.into())
    }

    /// Create a loader error.
    pub fn loader(msg: impl Into<String>) -> Self {
        Self::LoaderError(msg.into())
    }
}

impl From<reqwest::Error> for IngestError {
    fn from(err: reqwest::Error) -> Self {
        Self::SourceError(err.to_string())
    }
}

//! Error types for query execution.

use truck_search_repository::SearchError;
use thiserror::Error;

/// Errors that can occur while answering a query.
///
/// Both are reported to the client inside a failure envelope.
#[derive(Error, Debug)]
pub enum QueryError {
    /// No keyword was supplied.
    #[error("Please provide a query")]
    EmptyQuery,

    /// The search engine could not answer the query.
    #[error("Search backend unreachable: {0}")]
    Backend(#[from] SearchError),
}

impl QueryError {
    /// Message shown to clients in the failure envelope.
    pub fn client_message(&self) -> &'static str {
        match self {
            Self::EmptyQuery => "Please provide a query",
            Self::Backend(_) => "error in reaching elasticsearch",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_message() {
        assert_eq!(QueryError::EmptyQuery.client_message(), "Please provide a query");
        assert_eq!(
            QueryError::from(SearchError::connection("refused")).client_message(),
            "error in reaching elasticsearch"
        );
    }
}

//! Search engine client trait definition.
//!
//! This module defines the abstract interface for search engine operations,
//! allowing for different backend implementations (OpenSearch, Elasticsearch, etc.).

use async_trait::async_trait;

use crate::errors::SearchError;
use crate::types::{IndexDocumentRequest, MatchQuery};
use truck_search_shared::SearchHit;

/// Abstract interface for search engine operations.
///
/// This trait defines all the operations the service needs from a search
/// engine. Implementations can be swapped for different backends (OpenSearch,
/// mock, etc.) enabling easy testing.
///
/// # Thread Safety
///
/// All implementations must be `Send + Sync` so a single client can be shared
/// between the bootstrap and every request handler.
///
/// # Error Handling
///
/// All methods return `Result<T, SearchError>`. Failures to reach the engine
/// at all are reported as `SearchError::ConnectionError`.
#[async_trait]
pub trait SearchEngineClient: Send + Sync {
    /// Check whether an index with the given name exists.
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - The index exists
    /// * `Ok(false)` - The engine answered and the index is absent
    /// * `Err(SearchError::ConnectionError)` - The engine could not be reached
    /// * `Err(SearchError)` - Any other failure
    async fn index_exists(&self, index: &str) -> Result<bool, SearchError>;

    /// Index multiple documents in a single bulk request.
    ///
    /// Every document is written under its own id, replacing any existing
    /// document with that id.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - If all documents were indexed successfully
    /// * `Err(SearchError::BulkIndexError)` - If any document failed to index
    async fn bulk_index(
        &self,
        index: &str,
        requests: &[IndexDocumentRequest],
    ) -> Result<(), SearchError>;

    /// Make every document written so far visible to searches.
    async fn refresh_index(&self, index: &str) -> Result<(), SearchError>;

    /// Run a match query and return the raw hits in backend order.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let query = MatchQuery::new("fooditems", "tacos", 750);
    /// let hits = client.search(INDEX, &query).await?;
    /// println!("Found {} hits", hits.len());
    /// ```
    async fn search(&self, index: &str, query: &MatchQuery) -> Result<Vec<SearchHit>, SearchError>;

    /// Check if the search engine is healthy and reachable.
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - If the cluster status is green or yellow
    /// * `Ok(false)` - If the cluster reports red
    /// * `Err(SearchError)` - If the health check fails to execute
    async fn health_check(&self) -> Result<bool, SearchError>;
}

//! Query executor.
//!
//! Runs keyword queries against the food items of the indexed trucks.

use std::cmp::Ordering;
use std::sync::Arc;
use tracing::{debug, error, instrument};

use crate::errors::QueryError;
use truck_search_repository::{MatchQuery, SearchEngineClient};
use truck_search_shared::SearchHit;

/// The document field keywords are matched against.
pub const SEARCH_FIELD: &str = "fooditems";

/// Upper bound on hits per query. There is no pagination past it.
pub const MAX_HITS: usize = 750;

/// Executes keyword queries against the search index.
pub struct QueryExecutor {
    client: Arc<dyn SearchEngineClient>,
    index: String,
}

impl QueryExecutor {
    /// Create a new executor querying `index`.
    pub fn new(client: Arc<dyn SearchEngineClient>, index: impl Into<String>) -> Self {
        Self {
            client,
            index: index.into(),
        }
    }

    /// Run a match query for `keyword` on the food items field.
    ///
    /// Hits come back ordered by document id rather than by score, so the
    /// same set of hits always aggregates the same way.
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<SearchHit>)` - At most `MAX_HITS` hits
    /// * `Err(QueryError::EmptyQuery)` - The keyword is blank; the engine is not contacted
    /// * `Err(QueryError::Backend)` - The engine failed to answer
    #[instrument(skip(self), fields(index = %self.index))]
    pub async fn search(&self, keyword: &str) -> Result<Vec<SearchHit>, QueryError> {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            return Err(QueryError::EmptyQuery);
        }

        let query = MatchQuery::new(SEARCH_FIELD, keyword, MAX_HITS);
        let mut hits = self.client.search(&self.index, &query).await.map_err(|e| {
            error!(error = %e, "Search request failed");
            QueryError::Backend(e)
        })?;

        hits.truncate(MAX_HITS);
        sort_by_document_id(&mut hits);

        debug!(hit_count = hits.len(), "Query executed");
        Ok(hits)
    }
}

/// Stable sort on document id, numeric ids first and in numeric order.
fn sort_by_document_id(hits: &mut [SearchHit]) {
    hits.sort_by(|a, b| compare_ids(&a.id, &b.id));
}

fn compare_ids(a: &str, b: &str) -> Ordering {
    match (a.parse::<u64>(), b.parse::<u64>()) {
        (Ok(x), Ok(y)) => x.cmp(&y),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}

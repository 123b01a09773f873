//! OpenSearch client implementation.
//!
//! This module provides the concrete implementation of `SearchEngineClient`
//! using the OpenSearch Rust client.

use async_trait::async_trait;
use opensearch::{
    cluster::ClusterHealthParts,
    http::request::JsonBody,
    http::transport::{SingleNodeConnectionPool, TransportBuilder},
    http::response::Response,
    indices::{IndicesExistsParts, IndicesRefreshParts},
    BulkParts, OpenSearch, SearchParts,
};
use serde_json::Value;
use tracing::{debug, error, info, instrument, warn};
use url::Url;

use crate::errors::SearchError;
use crate::interfaces::SearchEngineClient;
use crate::opensearch::queries::{build_bulk_operations, build_match_query};
use crate::types::{IndexDocumentRequest, MatchQuery};
use truck_search_shared::{SearchHit, TruckDocument};

/// OpenSearch client implementation.
///
/// # Example
///
/// ```ignore
/// let client = OpenSearchClient::new("http://localhost:9200").await?;
/// if !client.index_exists("cibusdata").await? {
///     client.bulk_index("cibusdata", &[IndexDocumentRequest::new("0", body)]).await?;
///     client.refresh_index("cibusdata").await?;
/// }
/// ```
pub struct OpenSearchClient {
    client: OpenSearch,
}

impl OpenSearchClient {
    /// Create a new OpenSearch client connected to the specified URL.
    ///
    /// No request is sent here; an unreachable server only shows up on the
    /// first operation.
    ///
    /// # Arguments
    ///
    /// * `url` - The OpenSearch server URL (e.g., "http://localhost:9200")
    pub async fn new(url: &str) -> Result<Self, SearchError> {
        let parsed_url = Url::parse(url).map_err(|e| SearchError::connection(e.to_string()))?;

        let conn_pool = SingleNodeConnectionPool::new(parsed_url);
        let transport = TransportBuilder::new(conn_pool)
            .disable_proxy()
            .build()
            .map_err(|e| SearchError::connection(e.to_string()))?;

        let client = OpenSearch::new(transport);

        info!(url = %url, "Created OpenSearch client");

        Ok(Self { client })
    }

    /// Parse a single hit from a search response.
    ///
    /// Returns `None` for hits without an id or whose source is not a JSON
    /// object. Fields of unexpected types inside the source read as unset.
    fn parse_hit(hit: &Value) -> Option<SearchHit> {
        let id = hit.get("_id")?.as_str()?;
        let source = hit.get("_source").filter(|source| source.is_object())?;
        let document: TruckDocument = serde_json::from_value(source.clone()).ok()?;

        Some(SearchHit {
            id: id.to_string(),
            score: hit.get("_score").and_then(Value::as_f64),
            document,
        })
    }

    /// Extract the hits of a search response body, keeping backend order.
    fn parse_search_response(body: &Value) -> Result<Vec<SearchHit>, SearchError> {
        let hits = body
            .get("hits")
            .and_then(|h| h.get("hits"))
            .and_then(Value::as_array)
            .ok_or_else(|| SearchError::parse("Search response has no hits array"))?;

        let parsed: Vec<SearchHit> = hits.iter().filter_map(Self::parse_hit).collect();
        if parsed.len() < hits.len() {
            warn!(
                skipped = hits.len() - parsed.len(),
                "Skipped hits that could not be parsed"
            );
        }

        Ok(parsed)
    }

    /// Collect the error reasons of a bulk response.
    ///
    /// A bulk request can succeed as a whole while individual operations fail;
    /// those are flagged with a top level `errors: true`.
    fn bulk_failures(body: &Value) -> Vec<String> {
        let has_errors = body.get("errors").and_then(Value::as_bool).unwrap_or(false);
        if !has_errors {
            return Vec::new();
        }

        body.get("items")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(|item| item.get("index").and_then(|op| op.get("error")))
                    .map(|error| {
                        error
                            .get("reason")
                            .and_then(Value::as_str)
                            .map(str::to_string)
                            .unwrap_or_else(|| error.to_string())
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Turn a non-success response into an error built by `make_error`.
    async fn check_status(
        response: Response,
        operation: &str,
        make_error: fn(String) -> SearchError,
    ) -> Result<Response, SearchError> {
        let status = response.status_code();
        if status.is_success() {
            return Ok(response);
        }

        let error_body = response.text().await.unwrap_or_default();
        error!(status = %status, body = %error_body, operation = operation, "Request failed");
        Err(make_error(format!(
            "{} failed with status {}: {}",
            operation, status, error_body
        )))
    }
}

#[async_trait]
impl SearchEngineClient for OpenSearchClient {
    #[instrument(skip(self))]
    async fn index_exists(&self, index: &str) -> Result<bool, SearchError> {
        let response = self
            .client
            .indices()
            .exists(IndicesExistsParts::Index(&[index]))
            .send()
            .await
            .map_err(|e| SearchError::connection(e.to_string()))?;

        match response.status_code().as_u16() {
            200 => Ok(true),
            404 => Ok(false),
            status => Err(SearchError::index_admin(format!(
                "Existence check for index '{}' returned status {}",
                index, status
            ))),
        }
    }

    #[instrument(skip(self, requests), fields(count = requests.len()))]
    async fn bulk_index(
        &self,
        index: &str,
        requests: &[IndexDocumentRequest],
    ) -> Result<(), SearchError> {
        if requests.is_empty() {
            return Ok(());
        }

        let body: Vec<JsonBody<Value>> = build_bulk_operations(requests)
            .into_iter()
            .map(JsonBody::from)
            .collect();

        let response = self
            .client
            .bulk(BulkParts::Index(index))
            .body(body)
            .send()
            .await
            .map_err(|e| SearchError::connection(e.to_string()))?;

        let response = Self::check_status(response, "Bulk index", SearchError::BulkIndexError).await?;
        let response_body: Value = response
            .json()
            .await
            .map_err(|e| SearchError::parse(e.to_string()))?;

        let failures = Self::bulk_failures(&response_body);
        if let Some(first) = failures.first() {
            return Err(SearchError::bulk_index(format!(
                "{} of {} operations failed, first error: {}",
                failures.len(),
                requests.len(),
                first
            )));
        }

        debug!(count = requests.len(), "Bulk request indexed");
        Ok(())
    }

    async fn refresh_index(&self, index: &str) -> Result<(), SearchError> {
        let response = self
            .client
            .indices()
            .refresh(IndicesRefreshParts::Index(&[index]))
            .send()
            .await
            .map_err(|e| SearchError::connection(e.to_string()))?;

        Self::check_status(response, "Refresh", SearchError::IndexAdminError).await?;
        Ok(())
    }

    #[instrument(skip(self, query), fields(field = %query.field, size = query.size))]
    async fn search(&self, index: &str, query: &MatchQuery) -> Result<Vec<SearchHit>, SearchError> {
        let response = self
            .client
            .search(SearchParts::Index(&[index]))
            .body(build_match_query(query))
            .send()
            .await
            .map_err(|e| SearchError::connection(e.to_string()))?;

        let response = Self::check_status(response, "Search", SearchError::QueryError).await?;
        let body: Value = response
            .json()
            .await
            .map_err(|e| SearchError::parse(e.to_string()))?;

        let hits = Self::parse_search_response(&body)?;
        debug!(hit_count = hits.len(), "Search completed");
        Ok(hits)
    }

    async fn health_check(&self) -> Result<bool, SearchError> {
        let response = self
            .client
            .cluster()
            .health(ClusterHealthParts::None)
            .send()
            .await
            .map_err(|e| SearchError::connection(e.to_string()))?;

        let response = Self::check_status(response, "Health check", SearchError::IndexAdminError).await?;
        let body: Value = response
            .json()
            .await
            .map_err(|e| SearchError::parse(e.to_string()))?;

        let status = body.get("status").and_then(Value::as_str).unwrap_or("red");
        debug!(cluster_status = status, "Cluster health");
        Ok(matches!(status, "green" | "yellow"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_hit() {
        let hit = json!({
            "_id": "17",
            "_score": 1.5,
            "_source": {
                "applicant": "Taco Co",
                "fooditems": "tacos: burritos",
                "address": "1 Market St",
                "location": { "latitude": "37.79", "longitude": "-122.39" }
            }
        });

        let result = OpenSearchClient::parse_hit(&hit).unwrap();

        assert_eq!(result.id, "17");
        assert_eq!(result.score, Some(1.5));
        assert_eq!(result.document.applicant.as_deref(), Some("Taco Co"));
        assert!(result.document.has_location());
    }

    #[test]
    fn test_parse_hit_minimal() {
        let hit = json!({
            "_id": "3",
            "_source": { "applicant": "Bun Bus" }
        });

        let result = OpenSearchClient::parse_hit(&hit).unwrap();

        assert!(result.score.is_none());
        assert!(result.document.fooditems.is_none());
        assert!(!result.document.has_location());
    }

    #[test]
    fn test_parse_hit_invalid() {
        let no_id = json!({ "_source": { "applicant": "Bun Bus" } });
        assert!(OpenSearchClient::parse_hit(&no_id).is_none());

        let bad_source = json!({ "_id": "1", "_source": ["Bun Bus"] });
        assert!(OpenSearchClient::parse_hit(&bad_source).is_none());
    }

    #[test]
    fn test_parse_hit_keeps_oddly_typed_fields() {
        let hit = json!({
            "_id": "5",
            "_source": {
                "applicant": "Bun Bus",
                "address": 12,
                "fooditems": "buns",
                "location": null
            }
        });

        let result = OpenSearchClient::parse_hit(&hit).unwrap();

        assert_eq!(result.document.applicant.as_deref(), Some("Bun Bus"));
        assert!(result.document.address.is_none());
        assert_eq!(result.document.fooditems.as_deref(), Some("buns"));
        assert!(result.document.has_location());
    }

    #[test]
    fn test_parse_search_response() {
        let body = json!({
            "took": 3,
            "hits": {
                "total": { "value": 2 },
                "hits": [
                    { "_id": "4", "_score": 2.0, "_source": { "applicant": "A" } },
                    { "_id": "9", "_score": 1.0, "_source": { "applicant": "B" } }
                ]
            }
        });

        let hits = OpenSearchClient::parse_search_response(&body).unwrap();

        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].id, "4");
        assert_eq!(hits[1].id, "9");
    }

    #[test]
    fn test_parse_search_response_missing_hits() {
        let result = OpenSearchClient::parse_search_response(&json!({ "took": 1 }));
        assert!(matches!(result, Err(SearchError::ParseError(_))));
    }

    #[test]
    fn test_bulk_failures() {
        let ok = json!({ "errors": false, "items": [{ "index": { "_id": "0", "status": 201 } }] });
        assert!(OpenSearchClient::bulk_failures(&ok).is_empty());

        let failed = json!({
            "errors": true,
            "items": [
                { "index": { "_id": "0", "status": 201 } },
                { "index": { "_id": "1", "status": 400, "error": { "type": "mapper_parsing_exception", "reason": "failed to parse field [location]" } } }
            ]
        });
        assert_eq!(
            OpenSearchClient::bulk_failures(&failed),
            vec!["failed to parse field [location]".to_string()]
        );
    }
}

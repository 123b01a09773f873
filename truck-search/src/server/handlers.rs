use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use super::AppState;
use truck_search_query::QueryError;
use truck_search_shared::ResponsePayload;

/// Name of the keyword query parameter.
const KEYWORD_PARAM: &str = "q";

/// Raw query string pairs, in request order.
type QueryPairs = Vec<(String, String)>;

/// First value of `name`; later repeats are ignored.
pub fn first_param(pairs: &[(String, String)], name: &str) -> Option<String> {
    pairs
        .iter()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.clone())
}

/// Answer a keyword search.
///
/// Always responds 200; failures are reported in the payload status. An
/// unreadable query string counts as a missing keyword.
pub async fn handle_search(
    State(state): State<AppState>,
    query: Result<Query<QueryPairs>, QueryRejection>,
) -> Json<ResponsePayload> {
    let keyword = match query {
        Ok(Query(pairs)) => first_param(&pairs, KEYWORD_PARAM).unwrap_or_default(),
        Err(rejection) => {
            debug!(error = %rejection, "Unreadable query string");
            String::new()
        }
    };

    let payload = match state.executor.search(&keyword).await {
        Ok(hits) => state.aggregator.aggregate(&hits),
        Err(QueryError::EmptyQuery) => ResponsePayload::failure(QueryError::EmptyQuery.client_message()),
        Err(e) => {
            warn!(error = %e, keyword = %keyword, "Query failed");
            ResponsePayload::failure(e.client_message())
        }
    };

    if let ResponsePayload::Success {
        hits, locations, ..
    } = &payload
    {
        info!(keyword = %keyword, vendors = *hits, locations = *locations, "Query answered");
    }

    Json(payload)
}

pub async fn handle_health(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    match state.client.health_check().await {
        Ok(true) => (StatusCode::OK, Json(json!({ "status": "ok" }))),
        Ok(false) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "status": "unavailable" })),
        ),
        Err(e) => {
            warn!(error = %e, "Health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "unavailable" })),
            )
        }
    }
}

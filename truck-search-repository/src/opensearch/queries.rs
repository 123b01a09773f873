//! OpenSearch request body builders.

use serde_json::{json, Value};

use crate::types::{IndexDocumentRequest, MatchQuery};

/// Build the body of a match search.
///
/// The `size` parameter caps the number of hits; anything past it is dropped
/// by the engine.
pub fn build_match_query(query: &MatchQuery) -> Value {
    let mut field_query = serde_json::Map::new();
    field_query.insert(query.field.clone(), json!(query.text));

    json!({
        "query": {
            "match": field_query
        },
        "size": query.size
    })
}

/// Build the newline-delimited operations of a bulk index request.
///
/// Each document becomes an action line carrying its id followed by the
/// document body. The index itself is part of the request path.
pub fn build_bulk_operations(requests: &[IndexDocumentRequest]) -> Vec<Value> {
    let mut operations = Vec::with_capacity(requests.len() * 2);
    for request in requests {
        operations.push(json!({ "index": { "_id": request.id } }));
        operations.push(request.body.clone());
    }
    operations
}

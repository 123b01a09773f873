//! # Truck Search Repository
//!
//! This crate provides the trait the rest of the service uses to talk to the
//! search engine, the error type shared by every backend operation, and a
//! concrete implementation for OpenSearch (which also speaks to
//! Elasticsearch-compatible clusters).

pub mod errors;
pub mod interfaces;
pub mod opensearch;
pub mod types;

pub use errors::SearchError;
pub use interfaces::SearchEngineClient;
pub use opensearch::OpenSearchClient;
pub use types::{IndexDocumentRequest, MatchQuery};

//! # Truck Search Shared
//!
//! Shared types for the food truck search service: the documents stored in
//! the search index, the hits returned by a query and the vendor-grouped
//! payload handed back to HTTP clients.

pub mod document;
pub mod response;

pub use document::{SearchHit, TruckDocument, NOT_AVAILABLE};
pub use response::{Branch, ResponsePayload, VendorResult};

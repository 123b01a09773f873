//! # Truck Search Query
//!
//! This crate turns a keyword into the vendor-grouped payload returned to
//! clients.
//!
//! ## Architecture
//!
//! 1. **Executor**: Runs a capped match query on the food items field
//! 2. **Aggregator**: Groups the hits by vendor and derives food items and
//!    the drinks flag

pub mod aggregator;
pub mod errors;
pub mod executor;

pub use aggregator::{format_food_items, ResultAggregator};
pub use errors::QueryError;
pub use executor::{QueryExecutor, MAX_HITS, SEARCH_FIELD};

//! # Truck Search Ingest
//!
//! This crate gets the search index ready before the service accepts
//! queries.
//!
//! ## Architecture
//!
//! 1. **Source**: Fetches the food truck dataset snapshot
//! 2. **Loader**: Writes every record into the index as its own document
//! 3. **Bootstrap**: Checks whether the index exists, retrying while the
//!    search engine comes up, and runs the loader once when it does not

pub mod bootstrap;
pub mod errors;
pub mod loader;
pub mod source;

#[cfg(test)]
mod testing;

pub use bootstrap::{BootstrapConfig, BootstrapOutcome, IndexBootstrapper};
pub use errors::IngestError;
pub use loader::{BulkLoader, DocumentIdStrategy, LoadSummary, LoaderConfig};
pub use source::{DatasetSource, HttpDatasetSource, DEFAULT_DATASET_URL};

//! # Truck Search
//!
//! Main library for the food truck search service.
//!
//! This crate wires the search engine client, the index bootstrap and the
//! query pipeline together and exposes them over HTTP.

pub mod config;
pub mod server;
pub mod telemetry;

pub use config::{Dependencies, Settings};
pub use server::AppState;

use thiserror::Error;
use truck_search_ingest::IngestError;
use truck_search_repository::SearchError;

/// Errors that can occur while starting or running the service.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Index bootstrap or load error.
    #[error("Ingest error: {0}")]
    IngestError(#[from] IngestError),

    /// Search error.
    #[error("Search error: {0}")]
    SearchError(#[from] SearchError),

    /// IO error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl AppError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    /// Whether the error only reflects a requested shutdown.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::IngestError(IngestError::Cancelled))
    }
}

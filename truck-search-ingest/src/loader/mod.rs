//! Loader module for the bulk dataset load.
//!
//! Writes every record of the dataset into the search index as its own
//! document.

use std::fmt;
use std::hash::Hasher;
use std::str::FromStr;
use std::sync::Arc;
use serde_json::Value;
use tracing::{debug, info, instrument, warn};
use twox_hash::XxHash64;

use crate::errors::IngestError;
use crate::source::DatasetSource;
use truck_search_repository::{IndexDocumentRequest, SearchEngineClient};

/// Fields that identify a truck location independently of dataset order.
const CONTENT_KEY_FIELDS: [&str; 3] = ["applicant", "address", "schedule"];

/// How document ids are assigned during the load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DocumentIdStrategy {
    /// Zero-based position of the record in the dataset.
    ///
    /// Reloading a shorter or reordered dataset into a non-empty index leaves
    /// stale documents behind; the load only ever runs against an absent
    /// index, so this is accepted.
    #[default]
    Positional,
    /// Stable hash of the applicant, address and schedule of the record.
    ///
    /// Repeated loads overwrite the same documents whatever the dataset
    /// order. Records sharing all three fields collapse into one document.
    ContentHash,
}

impl DocumentIdStrategy {
    /// Compute the id of the record at `position`.
    pub fn document_id(&self, position: usize, record: &Value) -> String {
        match self {
            Self::Positional => position.to_string(),
            Self::ContentHash => {
                let mut hasher = XxHash64::with_seed(0);
                for field in CONTENT_KEY_FIELDS {
                    let value = record.get(field).and_then(Value::as_str).unwrap_or("");
                    hasher.write(value.as_bytes());
                    hasher.write_u8(0x1f);
                }
                format!("{:016x}", hasher.finish())
            }
        }
    }
}

impl FromStr for DocumentIdStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "positional" => Ok(Self::Positional),
            "content-hash" | "content_hash" => Ok(Self::ContentHash),
            other => Err(format!(
                "unknown document id strategy '{}', expected 'positional' or 'content-hash'",
                other
            )),
        }
    }
}

impl fmt::Display for DocumentIdStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Positional => f.write_str("positional"),
            Self::ContentHash => f.write_str("content-hash"),
        }
    }
}

/// Configuration for the bulk loader.
#[derive(Debug, Clone)]
pub struct LoaderConfig {
    /// Number of documents sent per bulk request.
    pub batch_size: usize,
    pub id_strategy: DocumentIdStrategy,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            batch_size: 500,
            id_strategy: DocumentIdStrategy::Positional,
        }
    }
}

/// Outcome of a completed load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadSummary {
    /// Number of documents written, one per dataset record.
    pub documents: usize,
    /// Number of bulk requests sent.
    pub batches: usize,
}

/// Loader that copies the dataset into the search index.
///
/// There is no partial-failure handling: the first failed fetch or write
/// aborts the load, and retries are left to whoever decides to load.
pub struct BulkLoader {
    client: Arc<dyn SearchEngineClient>,
    source: Arc<dyn DatasetSource>,
    index: String,
    config: LoaderConfig,
}

impl BulkLoader {
    /// Create a new loader writing into `index` with default configuration.
    pub fn new(
        client: Arc<dyn SearchEngineClient>,
        source: Arc<dyn DatasetSource>,
        index: impl Into<String>,
    ) -> Self {
        Self::with_config(client, source, index, LoaderConfig::default())
    }

    /// Create a new loader with custom configuration.
    pub fn with_config(
        client: Arc<dyn SearchEngineClient>,
        source: Arc<dyn DatasetSource>,
        index: impl Into<String>,
        config: LoaderConfig,
    ) -> Self {
        Self {
            client,
            source,
            index: index.into(),
            config,
        }
    }

    pub fn index(&self) -> &str {
        &self.index
    }

    /// Fetch the whole dataset and write every record as a document.
    #[instrument(skip(self), fields(index = %self.index, id_strategy = %self.config.id_strategy))]
    pub async fn load_all(&self) -> Result<LoadSummary, IngestError> {
        let records = self.source.fetch().await?;
        let requests = self.build_requests(records)?;

        if requests.is_empty() {
            warn!("Dataset is empty, nothing to load");
            return Ok(LoadSummary {
                documents: 0,
                batches: 0,
            });
        }

        info!(count = requests.len(), "Loading data into search index");

        let mut batches = 0;
        for batch in requests.chunks(self.config.batch_size.max(1)) {
            self.client.bulk_index(&self.index, batch).await?;
            batches += 1;
            debug!(batch = batches, count = batch.len(), "Batch written");
        }

        self.client.refresh_index(&self.index).await?;

        info!(total = requests.len(), batches = batches, "Total trucks loaded");
        Ok(LoadSummary {
            documents: requests.len(),
            batches,
        })
    }

    /// Pair every record with its document id.
    fn build_requests(&self, records: Vec<Value>) -> Result<Vec<IndexDocumentRequest>, IngestError> {
        records
            .into_iter()
            .enumerate()
            .map(|(position, record)| {
                if !record.is_object() {
                    return Err(IngestError::loader(format!(
                        "Record {} is not a JSON object",
                        position
                    )));
                }
                let id = self.config.id_strategy.document_id(position, &record);
                Ok(IndexDocumentRequest::new(id, record))
            })
            .collect()
    }
}

//! Dataset sources for the bulk load.

use async_trait::async_trait;
use serde_json::Value;
use tracing::{info, instrument};

use crate::errors::IngestError;

/// San Francisco mobile food facility permits, as a JSON array.
pub const DEFAULT_DATASET_URL: &str = "http://data.sfgov.org/resource/rqzj-sfat.json";

/// Somewhere the full food truck dataset can be fetched from.
#[async_trait]
pub trait DatasetSource: Send + Sync {
    /// Fetch every record of the dataset, in source order.
    async fn fetch(&self) -> Result<Vec<Value>, IngestError>;
}

/// Fetches the dataset with a single HTTP GET.
pub struct HttpDatasetSource {
    client: reqwest::Client,
    url: String,
}

impl HttpDatasetSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl DatasetSource for HttpDatasetSource {
    #[instrument(skip(self), fields(url = %self.url))]
    async fn fetch(&self) -> Result<Vec<Value>, IngestError> {
        let body: Value = self
            .client
            .get(&self.url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let records = records_from_body(body)?;
        info!(count = records.len(), "Fetched dataset");
        Ok(records)
    }
}

/// The dataset must be a top level JSON array.
fn records_from_body(body: Value) -> Result<Vec<Value>, IngestError> {
    match body {
        Value::Array(records) => Ok(records),
        other => Err(IngestError::source(format!(
            "Expected a JSON array of records, got {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

//! Mock search engine and dataset source shared by the unit tests.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::errors::IngestError;
use crate::source::DatasetSource;
use truck_search_repository::{IndexDocumentRequest, MatchQuery, SearchEngineClient, SearchError};
use truck_search_shared::SearchHit;

/// Mock search client for testing.
///
/// Existence checks answer from a script; once the script runs out the
/// fallback answer is repeated.
pub(crate) struct MockSearchClient {
    exists_script: Mutex<VecDeque<Result<bool, SearchError>>>,
    exists_fallback: Result<bool, SearchError>,
    fail_bulk: bool,
    pub exists_calls: AtomicUsize,
    pub bulk_calls: AtomicUsize,
    pub refresh_calls: AtomicUsize,
    pub indexed: Mutex<Vec<IndexDocumentRequest>>,
}

impl MockSearchClient {
    pub fn new(exists_fallback: Result<bool, SearchError>) -> Self {
        Self {
            exists_script: Mutex::new(VecDeque::new()),
            exists_fallback,
            fail_bulk: false,
            exists_calls: AtomicUsize::new(0),
            bulk_calls: AtomicUsize::new(0),
            refresh_calls: AtomicUsize::new(0),
            indexed: Mutex::new(Vec::new()),
        }
    }

    /// Answer the first existence checks with `script`, in order.
    pub fn with_script(mut self, script: Vec<Result<bool, SearchError>>) -> Self {
        self.exists_script = Mutex::new(script.into());
        self
    }

    pub fn failing_bulk(mut self) -> Self {
        self.fail_bulk = true;
        self
    }

    pub fn indexed_ids(&self) -> Vec<String> {
        self.indexed
            .lock()
            .unwrap()
            .iter()
            .map(|request| request.id.clone())
            .collect()
    }
}

#[async_trait]
impl SearchEngineClient for MockSearchClient {
    async fn index_exists(&self, _index: &str) -> Result<bool, SearchError> {
        self.exists_calls.fetch_add(1, Ordering::SeqCst);
        let scripted = self.exists_script.lock().unwrap().pop_front();
        scripted.unwrap_or_else(|| self.exists_fallback.clone())
    }

    async fn bulk_index(
        &self,
        _index: &str,
        requests: &[IndexDocumentRequest],
    ) -> Result<(), SearchError> {
        self.bulk_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_bulk {
            return Err(SearchError::bulk_index("mapper_parsing_exception"));
        }
        self.indexed.lock().unwrap().extend_from_slice(requests);
        Ok(())
    }

    async fn refresh_index(&self, _index: &str) -> Result<(), SearchError> {
        self.refresh_calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn search(&self, _index: &str, _query: &MatchQuery) -> Result<Vec<SearchHit>, SearchError> {
        Ok(Vec::new())
    }

    async fn health_check(&self) -> Result<bool, SearchError> {
        Ok(true)
    }
}

/// Mock dataset source for testing.
pub(crate) struct MockDatasetSource {
    records: Result<Vec<Value>, String>,
    pub fetch_calls: AtomicUsize,
}

impl MockDatasetSource {
    pub fn new(records: Vec<Value>) -> Self {
        Self {
            records: Ok(records),
            fetch_calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(msg: &str) -> Self {
        Self {
            records: Err(msg.to_string()),
            fetch_calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl DatasetSource for MockDatasetSource {
    async fn fetch(&self) -> Result<Vec<Value>, IngestError> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        self.records.clone().map_err(IngestError::source)
    }
}

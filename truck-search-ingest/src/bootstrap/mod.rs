//! Index bootstrap.
//!
//! Makes sure the search index exists before the service starts serving,
//! loading the dataset the first time round.

use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, instrument, warn};

use crate::errors::IngestError;
use crate::loader::{BulkLoader, LoadSummary};
use truck_search_repository::SearchEngineClient;

/// Configuration for the index bootstrap.
#[derive(Debug, Clone)]
pub struct BootstrapConfig {
    /// Number of existence checks to attempt before giving up.
    pub max_attempts: u32,
    /// Fixed delay between two failed existence checks.
    pub retry_delay: Duration,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            retry_delay: Duration::from_secs(5),
        }
    }
}

/// What the bootstrap had to do to get the index ready.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapOutcome {
    /// The index was already there; nothing was loaded.
    AlreadyPresent,
    /// The index was absent and the dataset was loaded.
    Loaded(LoadSummary),
}

/// Checks for the search index and loads it when absent.
///
/// Calling `ensure_index_ready` repeatedly is safe: once the index exists it
/// only performs the existence check.
pub struct IndexBootstrapper {
    client: Arc<dyn SearchEngineClient>,
    loader: BulkLoader,
    config: BootstrapConfig,
    cancel: CancellationToken,
}

impl IndexBootstrapper {
    /// Create a new bootstrapper with default configuration.
    ///
    /// The index checked is the one the loader writes into.
    pub fn new(client: Arc<dyn SearchEngineClient>, loader: BulkLoader) -> Self {
        Self::with_config(client, loader, BootstrapConfig::default())
    }

    /// Create a new bootstrapper with custom configuration.
    pub fn with_config(
        client: Arc<dyn SearchEngineClient>,
        loader: BulkLoader,
        config: BootstrapConfig,
    ) -> Self {
        Self {
            client,
            loader,
            config,
            cancel: CancellationToken::new(),
        }
    }

    /// Abort retry waits once `cancel` is triggered.
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Ensure the index exists, loading the dataset if it does not.
    ///
    /// # Returns
    ///
    /// * `Ok(BootstrapOutcome)` - The index is ready to serve queries
    /// * `Err(IngestError::RetriesExhausted)` - The search engine never answered
    /// * `Err(IngestError)` - Any other failure while checking or loading
    #[instrument(skip(self), fields(index = %self.loader.index()))]
    pub async fn ensure_index_ready(&self) -> Result<BootstrapOutcome, IngestError> {
        if self.index_exists().await? {
            info!("Index found, skipping load");
            return Ok(BootstrapOutcome::AlreadyPresent);
        }

        info!("Index not found");
        let summary = self.loader.load_all().await?;
        Ok(BootstrapOutcome::Loaded(summary))
    }

    /// Check whether the index exists, retrying while the engine is unreachable.
    ///
    /// Only connection failures are retried. Any other error is returned
    /// straight away.
    pub async fn index_exists(&self) -> Result<bool, IngestError> {
        let index = self.loader.index();
        let max_attempts = self.config.max_attempts;

        for attempt in 1..=max_attempts {
            match self.client.index_exists(index).await {
                Ok(exists) => {
                    if attempt > 1 {
                        info!(attempt = attempt, "Index check succeeded after retry");
                    }
                    return Ok(exists);
                }
                Err(e) if e.is_connection() => {
                    error!(
                        attempt = attempt,
                        max_attempts = max_attempts,
                        error = %e,
                        "Unable to connect to search engine"
                    );

                    // Don't wait after the last attempt
                    if attempt < max_attempts {
                        warn!(
                            delay_secs = self.config.retry_delay.as_secs_f64(),
                            "Retrying index check"
                        );
                        tokio::select! {
                            _ = self.cancel.cancelled() => {
                                warn!("Bootstrap cancelled while waiting to retry");
                                return Err(IngestError::Cancelled);
                            }
                            _ = tokio::time::sleep(self.config.retry_delay) => {}
                        }
                    }
                }
                Err(e) => return Err(e.into()),
            }
        }

        error!("Out of retries, bailing out");
        Err(IngestError::RetriesExhausted {
            attempts: max_attempts,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MockDatasetSource, MockSearchClient};
    use serde_json::json;
    use std::sync::atomic::Ordering;
    use tokio::time::Instant;
    use truck_search_repository::SearchError;

    fn bootstrapper(
        client: Arc<MockSearchClient>,
        source: Arc<MockDatasetSource>,
    ) -> IndexBootstrapper {
        let loader = BulkLoader::new(client.clone(), source, "cibusdata");
        IndexBootstrapper::new(client, loader)
    }

    fn source() -> Arc<MockDatasetSource> {
        Arc::new(MockDatasetSource::new(vec![
            json!({ "applicant": "Taco Co", "fooditems": "tacos" }),
            json!({ "applicant": "Bun Bus", "fooditems": "buns" }),
        ]))
    }

    #[tokio::test]
    async fn test_existing_index_is_not_loaded() {
        let client = Arc::new(MockSearchClient::new(Ok(true)));
        let source = source();
        let bootstrap = bootstrapper(client.clone(), source.clone());

        let outcome = bootstrap.ensure_index_ready().await.unwrap();

        assert_eq!(outcome, BootstrapOutcome::AlreadyPresent);
        assert_eq!(source.fetch_calls.load(Ordering::SeqCst), 0);
        assert_eq!(client.exists_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_missing_index_is_loaded() {
        let client = Arc::new(MockSearchClient::new(Ok(false)));
        let source = source();
        let bootstrap = bootstrapper(client.clone(), source.clone());

        let outcome = bootstrap.ensure_index_ready().await.unwrap();

        assert_eq!(
            outcome,
            BootstrapOutcome::Loaded(LoadSummary {
                documents: 2,
                batches: 1
            })
        );
        assert_eq!(source.fetch_calls.load(Ordering::SeqCst), 1);
        assert_eq!(client.indexed_ids(), vec!["0", "1"]);
    }

    #[tokio::test]
    async fn test_second_call_is_a_no_op() {
        let client = Arc::new(
            MockSearchClient::new(Ok(true)).with_script(vec![Ok(false)]),
        );
        let source = source();
        let bootstrap = bootstrapper(client.clone(), source.clone());

        bootstrap.ensure_index_ready().await.unwrap();
        let second = bootstrap.ensure_index_ready().await.unwrap();

        assert_eq!(second, BootstrapOutcome::AlreadyPresent);
        assert_eq!(source.fetch_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unreachable_engine_exhausts_retries_without_loading() {
        let client = Arc::new(MockSearchClient::new(Err(SearchError::connection(
            "connection refused",
        ))));
        let source = source();
        let bootstrap = bootstrapper(client.clone(), source.clone());

        let started = Instant::now();
        let err = bootstrap.ensure_index_ready().await.unwrap_err();

        assert!(matches!(err, IngestError::RetriesExhausted { attempts: 3 }));
        assert_eq!(client.exists_calls.load(Ordering::SeqCst), 3);
        assert_eq!(source.fetch_calls.load(Ordering::SeqCst), 0);
        // Two waits between three attempts
        assert!(started.elapsed() >= Duration::from_secs(10));
    }

    #[tokio::test(start_paused = true)]
    async fn test_retried_check_result_is_used() {
        let client = Arc::new(MockSearchClient::new(Ok(true)).with_script(vec![
            Err(SearchError::connection("connection refused")),
            Err(SearchError::connection("connection refused")),
        ]));
        let source = source();
        let bootstrap = bootstrapper(client.clone(), source.clone());

        let outcome = bootstrap.ensure_index_ready().await.unwrap();

        assert_eq!(outcome, BootstrapOutcome::AlreadyPresent);
        assert_eq!(client.exists_calls.load(Ordering::SeqCst), 3);
        assert_eq!(source.fetch_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_non_connection_error_is_not_retried() {
        let client = Arc::new(MockSearchClient::new(Err(SearchError::index_admin(
            "status 403",
        ))));
        let source = source();
        let bootstrap = bootstrapper(client.clone(), source.clone());

        let err = bootstrap.ensure_index_ready().await.unwrap_err();

        assert!(matches!(
            err,
            IngestError::SearchError(SearchError::IndexAdminError(_))
        ));
        assert_eq!(client.exists_calls.load(Ordering::SeqCst), 1);
        assert_eq!(source.fetch_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancellation_stops_retry_wait() {
        let client = Arc::new(MockSearchClient::new(Err(SearchError::connection(
            "connection refused",
        ))));
        let cancel = CancellationToken::new();
        let loader = BulkLoader::new(client.clone(), source(), "cibusdata");
        let bootstrap = IndexBootstrapper::new(client.clone(), loader).with_cancellation(cancel.clone());

        cancel.cancel();
        let err = bootstrap.ensure_index_ready().await.unwrap_err();

        assert!(matches!(err, IngestError::Cancelled));
        assert_eq!(client.exists_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_load_failure_propagates() {
        let client = Arc::new(MockSearchClient::new(Ok(false)));
        let source = Arc::new(MockDatasetSource::failing("dns error"));
        let bootstrap = bootstrapper(client.clone(), source.clone());

        let err = bootstrap.ensure_index_ready().await.unwrap_err();

        assert!(matches!(err, IngestError::SourceError(_)));
    }
}

//! Dependency initialization and wiring for the service.

use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::config::Settings;
use crate::server::AppState;
use crate::AppError;
use truck_search_ingest::{BulkLoader, HttpDatasetSource, IndexBootstrapper};
use truck_search_repository::{OpenSearchClient, SearchEngineClient};

/// Container for all initialized dependencies.
pub struct Dependencies {
    /// Gets the index ready; run once before serving.
    pub bootstrapper: IndexBootstrapper,
    /// Shared state of the HTTP handlers.
    pub state: AppState,
}

impl Dependencies {
    /// Build every component from `settings`.
    ///
    /// A single search engine client is shared by the bootstrap and the
    /// request handlers. `shutdown` aborts the bootstrap retry waits.
    ///
    /// # Returns
    ///
    /// * `Ok(Dependencies)` - Initialized dependencies
    /// * `Err(AppError::SearchError)` - If the search engine URL is unusable
    pub async fn new(settings: &Settings, shutdown: CancellationToken) -> Result<Self, AppError> {
        info!(
            opensearch_url = %settings.opensearch_url,
            index = %settings.index_name,
            dataset_url = %settings.dataset_url,
            "Initializing dependencies"
        );

        let client: Arc<dyn SearchEngineClient> =
            Arc::new(OpenSearchClient::new(&settings.opensearch_url).await?);

        let source = Arc::new(HttpDatasetSource::new(&settings.dataset_url));
        let loader = BulkLoader::with_config(
            client.clone(),
            source,
            &settings.index_name,
            settings.loader.clone(),
        );
        let bootstrapper =
            IndexBootstrapper::with_config(client.clone(), loader, settings.bootstrap.clone())
                .with_cancellation(shutdown);

        let state = AppState::new(client, &settings.index_name);

        Ok(Self {
            bootstrapper,
            state,
        })
    }
}

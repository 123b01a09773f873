//! HTTP server.
//!
//! Exposes the query pipeline on `GET /search?q=<keyword>` and a health probe
//! on `GET /health`.

mod handlers;

use axum::routing::get;
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::AppError;
use truck_search_query::{QueryExecutor, ResultAggregator};
use truck_search_repository::SearchEngineClient;

pub use handlers::first_param;

/// State shared by every request handler.
#[derive(Clone)]
pub struct AppState {
    pub client: Arc<dyn SearchEngineClient>,
    pub executor: Arc<QueryExecutor>,
    pub aggregator: Arc<ResultAggregator>,
}

impl AppState {
    /// Build the handler state around a search engine client.
    pub fn new(client: Arc<dyn SearchEngineClient>, index: impl Into<String>) -> Self {
        Self {
            executor: Arc::new(QueryExecutor::new(client.clone(), index)),
            aggregator: Arc::new(ResultAggregator::new()),
            client,
        }
    }
}

/// Build the service router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/search", get(handlers::handle_search))
        .route("/health", get(handlers::handle_health))
        .with_state(state)
}

/// Serve HTTP on `addr` until `shutdown` is cancelled.
pub async fn serve(
    addr: SocketAddr,
    state: AppState,
    shutdown: CancellationToken,
) -> Result<(), AppError> {
    let listener = TcpListener::bind(addr).await?;
    info!(addr = %addr, "Listening for queries");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await?;

    info!("Server stopped");
    Ok(())
}

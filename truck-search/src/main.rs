use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use truck_search::{server, telemetry, AppError, Dependencies, Settings};
use truck_search_ingest::BootstrapOutcome;

#[tokio::main]
async fn main() {
    // A missing .env file is fine
    dotenv::dotenv().ok();
    telemetry::init_tracing();

    match run().await {
        Ok(()) => {}
        Err(e) if e.is_cancelled() => info!("Shutdown requested during startup"),
        Err(e) => {
            error!(error = %e, "Startup failed, exiting");
            std::process::exit(1);
        }
    }
}

async fn run() -> Result<(), AppError> {
    let settings = Settings::from_env()?;

    let shutdown = CancellationToken::new();
    tokio::spawn(cancel_on_signal(shutdown.clone()));

    let deps = Dependencies::new(&settings, shutdown.clone()).await?;

    // The index has to be ready before the first query is accepted
    match deps.bootstrapper.ensure_index_ready().await? {
        BootstrapOutcome::AlreadyPresent => info!(index = %settings.index_name, "Index ready"),
        BootstrapOutcome::Loaded(summary) => info!(
            index = %settings.index_name,
            documents = summary.documents,
            "Index loaded"
        ),
    }

    server::serve(settings.bind_addr, deps.state, shutdown).await
}

/// Cancel `shutdown` on ctrl-c or SIGTERM.
async fn cancel_on_signal(shutdown: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }

    info!("Received shutdown signal");
    shutdown.cancel();
}

//! Main entry point for the hamlog API server

use anyhow::Context;
use hamlog_api::build_router;
use hamlog_core::{Config, init_logging};
use hamlog_database::Database;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if it exists (for development convenience)
    let dotenv = dotenvy::dotenv();

    let (config, load_error) = match Config::load() {
        Ok(config) => (config, None),
        Err(e) => (Config::default(), Some(e)),
    };

    init_logging(&config.logging).context("Failed to initialize logging")?;

    if let Err(e) = dotenv {
        info!("Note: .env file not loaded: {e}");
    }
    if let Some(e) = load_error {
        warn!("Failed to load config ({e}), using defaults");
    }

    info!(
        version = env!("CARGO_PKG_VERSION"),
        host = %config.server.host,
        port = config.server.port,
        "Starting hamlog API server"
    );

    let database = Database::new(&config)
        .await
        .context("Database connection failed")?;
    info!("Database connection established");

    database.migrate().await.context("Migration failed")?;
    info!("Database migrations completed");

    database
        .health_check()
        .await
        .context("Database health check failed")?;

    let stored = database
        .qso_count()
        .await
        .context("Failed to count stored QSOs")?;
    info!(qsos = stored, "Logbook opened");

    let app = build_router(config.clone(), database)
        .context("Failed to build router")?
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()));

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid server address")?;

    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {addr}"))?;

    info!("Server ready: API at http://{addr}/api/v1/qsos, health at http://{addr}/health");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Handle graceful shutdown signals
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {e}");
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
                error!("Failed to install signal handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received Ctrl+C, shutting down gracefully...");
        },
        () = terminate => {
            info!("Received terminate signal, shutting down gracefully...");
        },
    }
}

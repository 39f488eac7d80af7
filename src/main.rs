use anyhow::{Context, Result};
use axum::Router;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info};

use assistant_service::api::handlers::AppStateInner;
use assistant_service::api::routes::{cors_layer, create_router};
use assistant_service::config::Config;
use assistant_service::health::ProbeRegistry;
use assistant_service::logging::{self, LoggingSettings};
use assistant_service::metrics;

/// Wait for shutdown signal (SIGTERM or SIGINT)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            info!("Received SIGTERM signal");
        },
    }

    info!("Starting graceful shutdown...");
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;

    // Initialize logging; a missing or malformed artifact aborts startup
    let log_settings = LoggingSettings::load(&config.logging.config_path)
        .context("Failed to load logging configuration")?;
    logging::init(config.logging.format, &log_settings)
        .context("Failed to initialize logging")?;

    info!(
        format = config.logging.format.as_str(),
        "Starting {} v{}", config.app.title, config.app.version
    );

    // Initialize metrics
    metrics::registry::init_metrics();
    info!("Metrics registry initialized");

    // Probes are fixed from here on
    let probes = ProbeRegistry::standard();
    metrics::HEALTH_PROBES_REGISTERED.set(probes.len() as i64);
    info!(
        prefix = %config.health.prefix,
        probes = ?probes.names(),
        "Health probes registered"
    );

    let state = Arc::new(AppStateInner {
        version: config.app.version.clone(),
        probes,
    });

    let cors = cors_layer(&config.cors).context("Failed to build CORS policy")?;

    // Create router
    let app = create_router(state, &config.health.prefix, cors, Router::new());

    // Start server
    let addr = config.server_address();
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind server")?;

    info!("Server listening on {}", addr);

    // Serve with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");

    Ok(())
}

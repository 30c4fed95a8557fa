//! SyncScholars Backend - Entry Point
//!
//! Starts the API server (REST + realtime WebSocket) with graceful
//! shutdown support. A failed database connection at startup is fatal.

use std::sync::Arc;

use tokio::signal;
use tokio::sync::watch;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod api;
mod config;
mod database;
mod error;
mod models;
mod realtime;
mod repository;

use api::ApiServer;
use config::Config;
use database::Database;
use realtime::RealtimeHub;

#[tokio::main]
async fn main() -> error::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "syncscholars=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting SyncScholars Backend");

    // Load configuration
    let config = Config::from_env()?;
    info!("Configuration loaded");

    // Connect to database; unavailability at startup is fatal
    let db = match Database::new(&config).await {
        Ok(db) => db,
        Err(e) => {
            error!("Database connection failed: {}", e);
            return Err(e);
        }
    };
    info!("Connected to database");

    // Run migrations
    db.run_migrations().await?;
    info!("Database migrations complete");

    // Create the realtime hub shared by all WebSocket connections
    let hub = Arc::new(RealtimeHub::new(config.realtime.clone()));

    // Create API server
    let api_server = ApiServer::new(config.api.clone(), config.clone(), db.clone(), hub);

    // Create shutdown channel
    let (shutdown_tx, _) = watch::channel(false);
    let api_shutdown = shutdown_tx.subscribe();

    let api_task = tokio::spawn(async move {
        if let Err(e) = api_server.run(api_shutdown).await {
            error!("API server error: {}", e);
        }
    });

    info!(
        "Server started - API: {}:{}",
        config.api.host, config.api.port
    );

    // Wait for shutdown signal
    shutdown_signal().await;
    info!("Shutdown signal received");

    // Send shutdown signal and wait for the server to drain
    let _ = shutdown_tx.send(true);
    let _ = api_task.await;

    db.close().await;

    info!("SyncScholars Backend stopped");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

//! API server using Axum
//!
//! Hosts the REST API for users and study groups and the realtime
//! WebSocket endpoint.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use axum::Router;
use tokio::sync::watch;
use tower_http::trace::TraceLayer;
use tracing::{info, instrument};

use crate::config::{ApiServerConfig, Config};
use crate::database::Database;
use crate::error::Result;
use crate::realtime::RealtimeHub;

use super::middleware::cors_layer;
use super::routes;

/// Shared state for API handlers
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub config: Config,
    pub hub: Arc<RealtimeHub>,
    pub started_at: Instant,
}

/// API server
pub struct ApiServer {
    config: ApiServerConfig,
    state: AppState,
}

impl ApiServer {
    /// Create a new API server
    pub fn new(
        api_config: ApiServerConfig,
        full_config: Config,
        db: Database,
        hub: Arc<RealtimeHub>,
    ) -> Self {
        let state = AppState {
            db,
            config: full_config,
            hub,
            started_at: Instant::now(),
        };

        Self {
            config: api_config,
            state,
        }
    }

    /// Build the router
    fn build_router(&self) -> Router {
        let cors = cors_layer(&self.config.cors_origins);

        routes::create_router(self.state.clone())
            .layer(cors)
            .layer(TraceLayer::new_for_http())
    }

    /// Run the API server
    #[instrument(skip(self, shutdown))]
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) -> Result<()> {
        let addr: SocketAddr = format!("{}:{}", self.config.host, self.config.port)
            .parse()
            .expect("Invalid API server address");

        let router = self.build_router();

        info!("API server listening on {}", addr);

        let listener = tokio::net::TcpListener::bind(addr).await?;

        axum::serve(listener, router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.changed().await;
            })
            .await
            .map_err(|e| crate::error::ScholarsError::Internal(e.to_string()))?;

        info!("API server shut down");
        Ok(())
    }
}

//! Service banner and health endpoints

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;
use tracing::warn;

use crate::api::server::AppState;

/// Service banner
pub async fn root() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({
            "success": true,
            "message": "SyncScholars Backend API",
            "status": "running",
        })),
    )
}

/// Health check reporting process and database liveness
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let database = match state.db.health_check().await {
        Ok(_) => "connected",
        Err(e) => {
            warn!("Database health check failed: {}", e);
            "disconnected"
        }
    };

    (
        StatusCode::OK,
        Json(json!({
            "success": true,
            "database": database,
            "uptime_seconds": state.started_at.elapsed().as_secs(),
            "realtime_connections": state.hub.connection_count(),
        })),
    )
}

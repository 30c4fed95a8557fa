//! API route definitions

use std::time::Duration;

use axum::routing::{delete, get, post, put};
use axum::Router;
use tower_http::timeout::TimeoutLayer;

use super::handlers;
use super::middleware::RequestLogging;
use super::server::AppState;
use crate::realtime::socket;

/// Create the API router with all routes
pub fn create_router(state: AppState) -> Router {
    let timeout = TimeoutLayer::new(Duration::from_secs(state.config.api.request_timeout));

    Router::new()
        // Service banner and health check
        .route("/", get(handlers::health::root))
        .route("/health", get(handlers::health::health_check))
        // REST routes get a request timeout; the WebSocket route must not
        .nest("/api", api_routes().layer(timeout))
        .route("/ws", get(socket::realtime_ws))
        .layer(axum::middleware::from_fn(RequestLogging::log_request))
        .with_state(state)
}

/// REST routes for users and study groups
fn api_routes() -> Router<AppState> {
    Router::new()
        // User management
        .route("/users", get(handlers::user::list_users))
        .route("/users", post(handlers::user::create_user))
        .route("/users/:id", get(handlers::user::get_user))
        .route("/users/:id", put(handlers::user::update_user))
        .route("/users/:id", delete(handlers::user::delete_user))
        // Study group management
        .route("/groups", get(handlers::group::list_groups))
        .route("/groups", post(handlers::group::create_group))
        .route("/groups/:id", get(handlers::group::get_group))
        .route("/groups/:id", put(handlers::group::update_group))
        .route("/groups/:id", delete(handlers::group::delete_group))
        // Group membership
        .route("/groups/:id/members", get(handlers::group::list_members))
        .route("/groups/:id/members", post(handlers::group::add_member))
        .route(
            "/groups/:id/members/:user_id",
            delete(handlers::group::remove_member),
        )
}

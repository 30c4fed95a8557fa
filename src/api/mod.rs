//! API server implementation
//!
//! Provides REST endpoints for users and groups plus the realtime
//! WebSocket endpoint.

pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod server;

pub use server::ApiServer;

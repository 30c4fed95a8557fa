//! SyncScholars - Study Group Coordination Backend
//!
//! A backend for collaborative study groups written in Rust.
//!
//! ## Features
//!
//! - Realtime group channels over WebSocket (presence, session timers, chat)
//! - User and study group management with join codes
//! - PostgreSQL persistence with ordered migrations
//! - Health endpoint reporting process and database liveness

pub mod api;
pub mod config;
pub mod database;
pub mod error;
pub mod models;
pub mod realtime;
pub mod repository;

pub use config::Config;
pub use database::Database;
pub use error::{Result, ScholarsError};
pub use realtime::RealtimeHub;

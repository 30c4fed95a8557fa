//! Realtime group-session coordination layer
//!
//! Publish/subscribe channel layer for study groups: presence
//! notifications, session timer relay, and chat message fan-out over
//! WebSocket connections. All state is in-memory and process-scoped;
//! persistence of users and groups lives in the repository layer.

pub mod events;
pub mod handlers;
pub mod hub;
pub mod registry;
pub mod router;
pub mod socket;

pub use events::{ClientEvent, MessagePayload, ServerEvent, TimerEvent};
pub use hub::RealtimeHub;

//! Wire-level realtime events
//!
//! Frames are JSON text messages tagged with the event name:
//! `{"event": "join-group", "data": "g1"}`. Timer and message payloads
//! carry the target group id plus arbitrary client fields that are
//! relayed untouched.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Inbound events (client to server)
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum ClientEvent {
    /// Subscribe the sender to a group channel
    #[serde(rename = "join-group")]
    JoinGroup(String),
    /// Relay a timer state transition to the whole channel
    #[serde(rename = "timer-start")]
    TimerStart(TimerEvent),
    /// Relay a chat message to the channel
    #[serde(rename = "send-message")]
    SendMessage(MessagePayload),
}

/// Outbound events (server to client)
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", content = "data")]
pub enum ServerEvent {
    /// A new connection joined the channel; payload is its connection id
    #[serde(rename = "user-joined")]
    UserJoined(String),
    /// Echo of a timer transition, delivered to every member
    #[serde(rename = "timer-started")]
    TimerStarted(TimerEvent),
    /// Chat message fan-out
    #[serde(rename = "new-message")]
    NewMessage(MessagePayload),
}

/// Timer state transition payload
///
/// The timer fields (action, duration, ...) belong to the session-timer
/// feature; the realtime layer routes them without interpretation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimerEvent {
    #[serde(rename = "groupId")]
    pub group_id: String,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

/// Chat message payload, routed but never persisted here
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessagePayload {
    #[serde(rename = "groupId")]
    pub group_id: String,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

//! Connection registry
//!
//! Tracks every live realtime connection: which channels it has joined
//! and the bounded outbound queue events are delivered through.

use dashmap::DashMap;
use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};
use tokio::sync::mpsc;
use uuid::Uuid;

use super::events::ServerEvent;
use crate::error::{Result, ScholarsError};

/// One live realtime connection
#[derive(Debug, Default)]
struct Connection {
    /// Channel identifiers this connection has joined
    channels: HashSet<String>,
}

/// Registry of live connections
///
/// The connection map is guarded by its own lock; outbound handles live
/// in a concurrent map so broadcast fan-out never contends with
/// join/leave bookkeeping. No lock is held across an await point.
pub struct ConnectionRegistry {
    connections: RwLock<HashMap<Uuid, Connection>>,
    outbound: DashMap<Uuid, mpsc::Sender<ServerEvent>>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self {
            connections: RwLock::new(HashMap::new()),
            outbound: DashMap::new(),
        }
    }

    /// Register a new connection with an empty channel set
    ///
    /// Connection ids are minted per accept, so a duplicate means the
    /// transport misbehaved; the existing record is left untouched.
    pub fn register(&self, id: Uuid, sender: mpsc::Sender<ServerEvent>) -> Result<()> {
        let mut connections = self.connections.write();
        if connections.contains_key(&id) {
            return Err(ScholarsError::DuplicateConnection { id });
        }
        connections.insert(id, Connection::default());
        drop(connections);

        self.outbound.insert(id, sender);
        Ok(())
    }

    /// Remove a connection and return the channels it had joined
    ///
    /// Unknown ids are a silent no-op returning an empty set.
    pub fn deregister(&self, id: Uuid) -> HashSet<String> {
        self.outbound.remove(&id);
        self.connections
            .write()
            .remove(&id)
            .map(|conn| conn.channels)
            .unwrap_or_default()
    }

    /// Snapshot of the channels a connection has joined
    pub fn joined(&self, id: Uuid) -> Result<HashSet<String>> {
        self.connections
            .read()
            .get(&id)
            .map(|conn| conn.channels.clone())
            .ok_or(ScholarsError::UnknownConnection { id })
    }

    /// Record a channel join; returns whether the membership is new
    pub fn track_join(&self, id: Uuid, channel: &str) -> Result<bool> {
        let mut connections = self.connections.write();
        let conn = connections
            .get_mut(&id)
            .ok_or(ScholarsError::UnknownConnection { id })?;
        Ok(conn.channels.insert(channel.to_string()))
    }

    /// Record a channel leave; unknown connection or channel is a no-op
    pub fn track_leave(&self, id: Uuid, channel: &str) -> bool {
        self.connections
            .write()
            .get_mut(&id)
            .map(|conn| conn.channels.remove(channel))
            .unwrap_or(false)
    }

    /// Outbound delivery handle for a connection, if still live
    pub fn sender(&self, id: Uuid) -> Option<mpsc::Sender<ServerEvent>> {
        self.outbound.get(&id).map(|entry| entry.value().clone())
    }

    pub fn contains(&self, id: Uuid) -> bool {
        self.connections.read().contains_key(&id)
    }

    pub fn connection_count(&self) -> usize {
        self.connections.read().len()
    }

    /// Full joined-channel snapshot, for diagnostics and invariant checks
    pub fn snapshot(&self) -> HashMap<Uuid, HashSet<String>> {
        self.connections
            .read()
            .iter()
            .map(|(id, conn)| (*id, conn.channels.clone()))
            .collect()
    }
}

impl Default for ConnectionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sender() -> mpsc::Sender<ServerEvent> {
        mpsc::channel(8).0
    }

    #[test]
    fn test_register_and_get() {
        let registry = ConnectionRegistry::new();
        let id = Uuid::new_v4();

        registry.register(id, sender()).unwrap();

        assert!(registry.contains(id));
        assert!(registry.joined(id).unwrap().is_empty());
        assert!(registry.sender(id).is_some());
        assert_eq!(registry.connection_count(), 1);
    }

    #[test]
    fn test_register_duplicate_rejected() {
        let registry = ConnectionRegistry::new();
        let id = Uuid::new_v4();

        registry.register(id, sender()).unwrap();
        registry.track_join(id, "g1").unwrap();

        let err = registry.register(id, sender()).unwrap_err();
        assert!(matches!(err, ScholarsError::DuplicateConnection { .. }));

        // Existing record untouched by the rejected register
        assert!(registry.joined(id).unwrap().contains("g1"));
    }

    #[test]
    fn test_deregister_returns_joined_channels() {
        let registry = ConnectionRegistry::new();
        let id = Uuid::new_v4();

        registry.register(id, sender()).unwrap();
        registry.track_join(id, "g1").unwrap();
        registry.track_join(id, "g2").unwrap();

        let channels = registry.deregister(id);
        assert_eq!(channels.len(), 2);
        assert!(channels.contains("g1") && channels.contains("g2"));

        assert!(!registry.contains(id));
        assert!(registry.sender(id).is_none());
        assert!(matches!(
            registry.joined(id),
            Err(ScholarsError::UnknownConnection { .. })
        ));
    }

    #[test]
    fn test_deregister_unknown_is_noop() {
        let registry = ConnectionRegistry::new();
        assert!(registry.deregister(Uuid::new_v4()).is_empty());
    }

    #[test]
    fn test_track_join_is_idempotent() {
        let registry = ConnectionRegistry::new();
        let id = Uuid::new_v4();
        registry.register(id, sender()).unwrap();

        assert!(registry.track_join(id, "g1").unwrap());
        assert!(!registry.track_join(id, "g1").unwrap());
        assert_eq!(registry.joined(id).unwrap().len(), 1);
    }

    #[test]
    fn test_track_join_unknown_connection() {
        let registry = ConnectionRegistry::new();
        let err = registry.track_join(Uuid::new_v4(), "g1").unwrap_err();
        assert!(matches!(err, ScholarsError::UnknownConnection { .. }));
    }

    #[test]
    fn test_track_leave_is_idempotent() {
        let registry = ConnectionRegistry::new();
        let id = Uuid::new_v4();
        registry.register(id, sender()).unwrap();
        registry.track_join(id, "g1").unwrap();

        assert!(registry.track_leave(id, "g1"));
        assert!(!registry.track_leave(id, "g1"));
        assert!(!registry.track_leave(Uuid::new_v4(), "g1"));
    }
}

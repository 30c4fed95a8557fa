//! Channel router
//!
//! Maps group identifiers to the connections subscribed to them.
//! Channels come into existence on first join and are pruned as soon as
//! their member set empties, so the table never accumulates dead groups
//! over a long-running process.

use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

/// Channel membership table
pub struct ChannelRouter {
    channels: RwLock<HashMap<String, HashSet<Uuid>>>,
}

impl ChannelRouter {
    pub fn new() -> Self {
        Self {
            channels: RwLock::new(HashMap::new()),
        }
    }

    /// Add a connection to a channel, creating it on first join
    ///
    /// Idempotent; returns whether the membership is new.
    pub fn join(&self, channel: &str, id: Uuid) -> bool {
        self.channels
            .write()
            .entry(channel.to_string())
            .or_default()
            .insert(id)
    }

    /// Remove a connection from a channel; idempotent
    ///
    /// The channel entry is pruned once its member set is empty.
    pub fn leave(&self, channel: &str, id: Uuid) -> bool {
        let mut channels = self.channels.write();
        let Some(members) = channels.get_mut(channel) else {
            return false;
        };

        let removed = members.remove(&id);
        if members.is_empty() {
            channels.remove(channel);
        }
        removed
    }

    /// Membership snapshot; empty for unknown channels
    pub fn members(&self, channel: &str) -> Vec<Uuid> {
        self.channels
            .read()
            .get(channel)
            .map(|members| members.iter().copied().collect())
            .unwrap_or_default()
    }

    pub fn member_count(&self, channel: &str) -> usize {
        self.channels
            .read()
            .get(channel)
            .map(|members| members.len())
            .unwrap_or(0)
    }

    pub fn channel_count(&self) -> usize {
        self.channels.read().len()
    }

    /// Full membership snapshot, for diagnostics and invariant checks
    pub fn snapshot(&self) -> HashMap<String, HashSet<Uuid>> {
        self.channels.read().clone()
    }
}

impl Default for ChannelRouter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_creates_channel() {
        let router = ChannelRouter::new();
        let a = Uuid::new_v4();

        assert!(router.join("g1", a));
        assert_eq!(router.channel_count(), 1);
        assert_eq!(router.members("g1"), vec![a]);
    }

    #[test]
    fn test_double_join_is_idempotent() {
        let router = ChannelRouter::new();
        let a = Uuid::new_v4();

        assert!(router.join("g1", a));
        assert!(!router.join("g1", a));
        assert_eq!(router.member_count("g1"), 1);
    }

    #[test]
    fn test_leave_prunes_empty_channel() {
        let router = ChannelRouter::new();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();

        router.join("g1", a);
        router.join("g1", b);

        assert!(router.leave("g1", a));
        assert_eq!(router.channel_count(), 1);

        assert!(router.leave("g1", b));
        assert_eq!(router.channel_count(), 0);
        assert!(router.members("g1").is_empty());
    }

    #[test]
    fn test_leave_is_idempotent() {
        let router = ChannelRouter::new();
        let a = Uuid::new_v4();

        router.join("g1", a);
        assert!(router.leave("g1", a));
        assert!(!router.leave("g1", a));
        assert!(!router.leave("never-existed", a));
    }

    #[test]
    fn test_members_of_unknown_channel_is_empty() {
        let router = ChannelRouter::new();
        assert!(router.members("ghost").is_empty());
        assert_eq!(router.member_count("ghost"), 0);
    }
}

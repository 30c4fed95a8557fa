//! Realtime hub
//!
//! Process-scoped coordinator owning the connection registry and the
//! channel router. Every mutation of channel membership flows through
//! here, which keeps the two maps consistent: a connection id is in a
//! channel's member set exactly when that channel is in the
//! connection's joined set. Delivery is fire-and-forget: events are
//! pushed onto each receiver's bounded queue with `try_send` and
//! dropped with a log line when the queue is full.

use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::events::ServerEvent;
use super::registry::ConnectionRegistry;
use super::router::ChannelRouter;
use crate::config::RealtimeConfig;
use crate::error::Result;

/// Coordinator for all realtime connections and channels
pub struct RealtimeHub {
    registry: ConnectionRegistry,
    router: ChannelRouter,
    config: RealtimeConfig,
}

impl RealtimeHub {
    pub fn new(config: RealtimeConfig) -> Self {
        Self {
            registry: ConnectionRegistry::new(),
            router: ChannelRouter::new(),
            config,
        }
    }

    pub fn config(&self) -> &RealtimeConfig {
        &self.config
    }

    /// Connection opened: register it with its outbound queue
    pub fn on_connect(&self, id: Uuid, outbound: mpsc::Sender<ServerEvent>) -> Result<()> {
        self.registry.register(id, outbound)?;
        info!(connection_id = %id, "Realtime connection registered");
        Ok(())
    }

    /// Connection closed: drop the registry entry and leave every
    /// channel it had joined, so no membership dangles
    pub fn on_disconnect(&self, id: Uuid) {
        let channels = self.registry.deregister(id);
        for channel in &channels {
            self.router.leave(channel, id);
        }
        info!(
            connection_id = %id,
            channels = channels.len(),
            "Realtime connection deregistered"
        );
    }

    /// Subscribe a connection to a channel and notify existing members
    ///
    /// Idempotent: a repeat join changes nothing and emits no presence
    /// event. The joining connection is excluded from the notification.
    pub fn join(&self, channel: &str, id: Uuid) -> Result<()> {
        if !self.registry.track_join(id, channel)? {
            debug!(connection_id = %id, channel = channel, "Repeat join ignored");
            return Ok(());
        }
        self.router.join(channel, id);
        debug!(connection_id = %id, channel = channel, "Joined channel");

        self.broadcast(channel, ServerEvent::UserJoined(id.to_string()), Some(id));
        Ok(())
    }

    /// Unsubscribe a connection from a channel; idempotent
    pub fn leave(&self, channel: &str, id: Uuid) {
        self.registry.track_leave(id, channel);
        self.router.leave(channel, id);
    }

    /// Deliver an event to every member of a channel except the
    /// optionally-excluded sender; returns the number of deliveries
    ///
    /// Empty or unknown channels are a no-op. A member whose queue is
    /// full misses the event; delivery is best-effort.
    pub fn broadcast(&self, channel: &str, event: ServerEvent, exclude: Option<Uuid>) -> usize {
        let mut delivered = 0;

        for member in self.router.members(channel) {
            if Some(member) == exclude {
                continue;
            }

            let Some(sender) = self.registry.sender(member) else {
                continue;
            };

            match sender.try_send(event.clone()) {
                Ok(()) => delivered += 1,
                Err(mpsc::error::TrySendError::Full(_)) => {
                    warn!(
                        connection_id = %member,
                        channel = channel,
                        "Outbound buffer full, dropping event"
                    );
                }
                Err(mpsc::error::TrySendError::Closed(_)) => {
                    debug!(connection_id = %member, "Outbound queue closed");
                }
            }
        }

        delivered
    }

    /// Broadcast without sender exclusion, for events whose origin
    /// needs the same echo it triggered (timer transitions)
    pub fn broadcast_including_self(&self, channel: &str, event: ServerEvent) -> usize {
        self.broadcast(channel, event, None)
    }

    pub fn connection_count(&self) -> usize {
        self.registry.connection_count()
    }

    pub fn channel_count(&self) -> usize {
        self.router.channel_count()
    }

    /// Read-only access to the connection registry
    pub fn registry(&self) -> &ConnectionRegistry {
        &self.registry
    }

    /// Read-only access to the channel router
    pub fn router(&self) -> &ChannelRouter {
        &self.router
    }
}

//! Session event handlers
//!
//! Stateless dispatch from inbound wire events to hub operations. Each
//! handler validates its payload and delegates; a handler error drops
//! that one event and never tears down the connection loop.

use tracing::debug;
use uuid::Uuid;

use super::events::{ClientEvent, MessagePayload, ServerEvent, TimerEvent};
use super::hub::RealtimeHub;
use crate::error::{Result, ScholarsError};

/// Route an inbound event to its handler
pub fn dispatch(hub: &RealtimeHub, connection_id: Uuid, event: ClientEvent) -> Result<()> {
    match event {
        ClientEvent::JoinGroup(group_id) => on_join_group(hub, connection_id, &group_id),
        ClientEvent::TimerStart(payload) => on_timer_start(hub, connection_id, payload),
        ClientEvent::SendMessage(payload) => on_send_message(hub, connection_id, payload),
    }
}

/// Subscribe the connection to the group channel; existing members are
/// notified with `user-joined` by the hub
fn on_join_group(hub: &RealtimeHub, connection_id: Uuid, group_id: &str) -> Result<()> {
    require_group_id(group_id)?;
    hub.join(group_id, connection_id)
}

/// Relay a timer transition to every channel member including the
/// origin, whose UI depends on the echo
fn on_timer_start(hub: &RealtimeHub, connection_id: Uuid, payload: TimerEvent) -> Result<()> {
    require_group_id(&payload.group_id)?;

    let channel = payload.group_id.clone();
    let delivered = hub.broadcast_including_self(&channel, ServerEvent::TimerStarted(payload));
    debug!(
        connection_id = %connection_id,
        channel = %channel,
        delivered = delivered,
        "Relayed timer transition"
    );
    Ok(())
}

/// Relay a chat message; whether the sender gets its own copy is a
/// deployment policy (`reflect_to_sender`)
fn on_send_message(hub: &RealtimeHub, connection_id: Uuid, payload: MessagePayload) -> Result<()> {
    require_group_id(&payload.group_id)?;

    let exclude = if hub.config().reflect_to_sender {
        None
    } else {
        Some(connection_id)
    };

    let channel = payload.group_id.clone();
    let delivered = hub.broadcast(&channel, ServerEvent::NewMessage(payload), exclude);
    debug!(
        connection_id = %connection_id,
        channel = %channel,
        delivered = delivered,
        "Relayed chat message"
    );
    Ok(())
}

fn require_group_id(group_id: &str) -> Result<()> {
    if group_id.trim().is_empty() {
        return Err(ScholarsError::MalformedEvent(
            "event requires a non-empty group id".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RealtimeConfig;
    use serde_json::json;
    use tokio::sync::mpsc;

    fn test_hub(reflect_to_sender: bool) -> RealtimeHub {
        RealtimeHub::new(RealtimeConfig {
            reflect_to_sender,
            buffer_size: 8,
        })
    }

    fn connect(hub: &RealtimeHub) -> (Uuid, mpsc::Receiver<ServerEvent>) {
        let id = Uuid::new_v4();
        let (tx, rx) = mpsc::channel(8);
        hub.on_connect(id, tx).unwrap();
        (id, rx)
    }

    fn message(group_id: &str, text: &str) -> MessagePayload {
        serde_json::from_value(json!({"groupId": group_id, "text": text})).unwrap()
    }

    #[tokio::test]
    async fn test_join_group_via_dispatch() {
        let hub = test_hub(true);
        let (a, mut rx_a) = connect(&hub);
        let (b, _rx_b) = connect(&hub);

        dispatch(&hub, a, ClientEvent::JoinGroup("g1".into())).unwrap();
        dispatch(&hub, b, ClientEvent::JoinGroup("g1".into())).unwrap();

        let ServerEvent::UserJoined(id) = rx_a.try_recv().unwrap() else {
            panic!("expected user-joined");
        };
        assert_eq!(id, b.to_string());
    }

    #[tokio::test]
    async fn test_empty_group_id_is_malformed() {
        let hub = test_hub(true);
        let (a, _rx_a) = connect(&hub);

        let cases = [
            ClientEvent::JoinGroup("".into()),
            ClientEvent::JoinGroup("   ".into()),
            ClientEvent::TimerStart(
                serde_json::from_value(json!({"groupId": "", "action": "start"})).unwrap(),
            ),
            ClientEvent::SendMessage(message("", "hi")),
        ];

        for event in cases {
            let err = dispatch(&hub, a, event).unwrap_err();
            assert!(matches!(err, ScholarsError::MalformedEvent(_)));
        }

        // Nothing was joined or delivered
        assert_eq!(hub.channel_count(), 0);
    }

    #[tokio::test]
    async fn test_message_reflected_to_sender_by_default() {
        let hub = test_hub(true);
        let (a, mut rx_a) = connect(&hub);
        let (b, mut rx_b) = connect(&hub);
        dispatch(&hub, a, ClientEvent::JoinGroup("g1".into())).unwrap();
        dispatch(&hub, b, ClientEvent::JoinGroup("g1".into())).unwrap();
        let _ = rx_a.try_recv();

        dispatch(&hub, a, ClientEvent::SendMessage(message("g1", "hi"))).unwrap();

        assert!(matches!(
            rx_a.try_recv().unwrap(),
            ServerEvent::NewMessage(_)
        ));
        assert!(matches!(
            rx_b.try_recv().unwrap(),
            ServerEvent::NewMessage(_)
        ));
    }

    #[tokio::test]
    async fn test_message_not_reflected_when_disabled() {
        let hub = test_hub(false);
        let (a, mut rx_a) = connect(&hub);
        let (b, mut rx_b) = connect(&hub);
        dispatch(&hub, a, ClientEvent::JoinGroup("g1".into())).unwrap();
        dispatch(&hub, b, ClientEvent::JoinGroup("g1".into())).unwrap();
        let _ = rx_a.try_recv();

        dispatch(&hub, a, ClientEvent::SendMessage(message("g1", "hi"))).unwrap();

        assert!(rx_a.try_recv().is_err());

        let ServerEvent::NewMessage(payload) = rx_b.try_recv().unwrap() else {
            panic!("expected new-message");
        };
        assert_eq!(payload.fields["text"], json!("hi"));
    }

    #[tokio::test]
    async fn test_timer_start_echoes_identical_payload() {
        let hub = test_hub(true);
        let (a, mut rx_a) = connect(&hub);
        let (b, mut rx_b) = connect(&hub);
        dispatch(&hub, a, ClientEvent::JoinGroup("g1".into())).unwrap();
        dispatch(&hub, b, ClientEvent::JoinGroup("g1".into())).unwrap();
        let _ = rx_a.try_recv();

        let payload: TimerEvent = serde_json::from_value(
            json!({"groupId": "g1", "action": "start", "duration": 1500}),
        )
        .unwrap();
        dispatch(&hub, a, ClientEvent::TimerStart(payload.clone())).unwrap();

        for rx in [&mut rx_a, &mut rx_b] {
            let ServerEvent::TimerStarted(received) = rx.try_recv().unwrap() else {
                panic!("expected timer-started");
            };
            assert_eq!(received, payload);
        }
    }

    #[tokio::test]
    async fn test_one_malformed_event_does_not_affect_others() {
        let hub = test_hub(true);
        let (a, _rx_a) = connect(&hub);
        let (b, mut rx_b) = connect(&hub);
        dispatch(&hub, a, ClientEvent::JoinGroup("g1".into())).unwrap();
        dispatch(&hub, b, ClientEvent::JoinGroup("g1".into())).unwrap();

        // A sends garbage, then a valid message; B still gets the valid one
        assert!(dispatch(&hub, a, ClientEvent::SendMessage(message("", "bad"))).is_err());
        dispatch(&hub, a, ClientEvent::SendMessage(message("g1", "good"))).unwrap();

        let ServerEvent::NewMessage(payload) = rx_b.try_recv().unwrap() else {
            panic!("expected new-message");
        };
        assert_eq!(payload.fields["text"], json!("good"));
    }
}

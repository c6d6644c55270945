use serde::Serialize;
use tokio::sync::broadcast;

/// Session lifecycle notifications for whatever renders the current user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SessionEvent {
    /// Startup profile check finished.
    Hydrated { authenticated: bool },
    LoggedIn { username: String },
    LoggedOut,
    /// A non-login request came back 401 and the session was torn down.
    Invalidated { endpoint: String },
}

pub type EventBus = broadcast::Sender<SessionEvent>;

pub fn init_event_bus() -> EventBus {
    let (tx, _rx) = broadcast::channel(64);
    tx
}

/// Sends without caring whether anyone is listening.
pub fn publish(bus: &EventBus, event: SessionEvent) {
    tracing::debug!(event = ?event, "session event");
    let _ = bus.send(event);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn subscribers_receive_events_in_order() {
        let bus = init_event_bus();
        let mut rx = bus.subscribe();

        publish(&bus, SessionEvent::LoggedIn { username: "alice".into() });
        publish(&bus, SessionEvent::LoggedOut);

        assert_eq!(rx.recv().await.unwrap(), SessionEvent::LoggedIn { username: "alice".into() });
        assert_eq!(rx.recv().await.unwrap(), SessionEvent::LoggedOut);
    }

    #[test]
    fn publishing_without_subscribers_is_fine() {
        let bus = init_event_bus();
        publish(&bus, SessionEvent::Hydrated { authenticated: false });
    }

    #[test]
    fn serializes_with_event_tag() {
        let json = serde_json::to_value(SessionEvent::Invalidated { endpoint: "/auth/profile".into() }).unwrap();
        assert_eq!(json["event"], "invalidated");
        assert_eq!(json["endpoint"], "/auth/profile");
    }
}

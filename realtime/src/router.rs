use crate::connection::{ConnectionRegistry, UserId};
use crate::message::{Event, EventType};
use log::*;
use std::sync::Arc;

/// Pushes events to every live connection of a user.
pub struct EventRouter {
    registry: Arc<ConnectionRegistry>,
}

impl EventRouter {
    pub fn new(registry: Arc<ConnectionRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &Arc<ConnectionRegistry> {
        &self.registry
    }

    /// Push `event` to each connection of `user_id` and return how many accepted it.
    ///
    /// A connection whose transport refuses the push is removed from the registry.
    /// Nothing is raised to the caller; an offline user simply yields zero.
    pub fn route(&self, user_id: &UserId, event: &Event) -> usize {
        let transports = self.registry.transports_of(user_id);
        if transports.is_empty() {
            debug!(
                "No live connections for user {user_id}, dropping {} event",
                event.event_type()
            );
            return 0;
        }

        let mut delivered = 0;
        for (connection_id, transport) in transports {
            match transport.send(event) {
                Ok(()) => delivered += 1,
                Err(e) => {
                    warn!(
                        "Failed to push {} event to connection {connection_id}: {e}",
                        event.event_type()
                    );
                    self.registry.leave(&connection_id);
                }
            }
        }

        trace!(
            "Routed {} event to {delivered} connection(s) of user {user_id}",
            event.event_type()
        );
        delivered
    }

    /// Close and remove every connection of `user_id`, returning how many there were.
    pub fn disconnect(&self, user_id: &UserId) -> usize {
        let transports = self.registry.transports_of(user_id);
        for (connection_id, transport) in &transports {
            transport.close();
            self.registry.leave(connection_id);
        }

        if !transports.is_empty() {
            info!(
                "Disconnected {} connection(s) of user {user_id}",
                transports.len()
            );
        }
        transports.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::tests::RecordingTransport;
    use crate::connection::ConnectionId;
    use std::collections::HashSet;

    fn typing(sender: &str) -> Event {
        Event::UserTyping {
            sender_id: sender.to_string(),
        }
    }

    #[test]
    fn route_to_an_offline_user_notifies_nobody() {
        let router = EventRouter::new(Arc::new(ConnectionRegistry::new()));

        assert_eq!(router.route(&"a".to_string(), &typing("b")), 0);
    }

    #[test]
    fn route_pushes_to_every_connection_of_the_target_only() {
        let registry = Arc::new(ConnectionRegistry::new());
        let phone = Arc::new(RecordingTransport::default());
        let laptop = Arc::new(RecordingTransport::default());
        let bystander = Arc::new(RecordingTransport::default());
        registry.join("a".to_string(), ConnectionId::new(), phone.clone());
        registry.join("a".to_string(), ConnectionId::new(), laptop.clone());
        registry.join("c".to_string(), ConnectionId::new(), bystander.clone());
        let router = EventRouter::new(registry);

        assert_eq!(router.route(&"a".to_string(), &typing("b")), 2);

        assert_eq!(phone.sent(), vec![typing("b")]);
        assert_eq!(laptop.sent(), vec![typing("b")]);
        assert!(bystander.sent().is_empty());
    }

    #[test]
    fn a_dead_connection_is_reaped_without_blocking_the_others() {
        let registry = Arc::new(ConnectionRegistry::new());
        let alive = Arc::new(RecordingTransport::default());
        let alive_id = ConnectionId::new();
        registry.join("a".to_string(), alive_id.clone(), alive.clone());
        registry.join(
            "a".to_string(),
            ConnectionId::new(),
            Arc::new(RecordingTransport::dead()),
        );
        let router = EventRouter::new(Arc::clone(&registry));

        assert_eq!(router.route(&"a".to_string(), &typing("b")), 1);

        assert_eq!(alive.sent(), vec![typing("b")]);
        assert_eq!(registry.members_of("a"), HashSet::from([alive_id]));
    }

    #[test]
    fn disconnect_closes_and_removes_every_connection() {
        let registry = Arc::new(ConnectionRegistry::new());
        let phone = Arc::new(RecordingTransport::default());
        let laptop = Arc::new(RecordingTransport::default());
        registry.join("a".to_string(), ConnectionId::new(), phone.clone());
        registry.join("a".to_string(), ConnectionId::new(), laptop.clone());
        let router = EventRouter::new(Arc::clone(&registry));

        assert_eq!(router.disconnect(&"a".to_string()), 2);

        assert!(phone.is_closed());
        assert!(laptop.is_closed());
        assert!(!registry.is_present("a"));
        assert_eq!(router.disconnect(&"a".to_string()), 0);
    }
}

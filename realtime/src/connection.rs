use crate::message::Event;
use dashmap::DashMap;
use log::*;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

// Type alias for user IDs (web layer converts domain::Id to String)
pub type UserId = String;

/// Unique identifier for a connection (server-generated)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConnectionId(String);

impl ConnectionId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("transport closed")]
    Closed,
    #[error("transport failed: {0}")]
    Failed(String),
}

/// Capability to push events to one client connection.
///
/// `send` must not block: implementations hand the event off to whatever task
/// owns the socket.
pub trait Transport: Send + Sync {
    fn send(&self, event: &Event) -> Result<(), TransportError>;

    /// Ask the owner of the socket to terminate it.
    fn close(&self);
}

/// Frames consumed by the task that owns the socket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outbound {
    Event(Event),
    Close,
}

/// Transport backed by an unbounded channel drained by a socket writer task.
#[derive(Debug, Clone)]
pub struct ChannelTransport {
    sender: UnboundedSender<Outbound>,
}

impl ChannelTransport {
    pub fn new() -> (Self, UnboundedReceiver<Outbound>) {
        let (sender, receiver) = unbounded_channel();
        (Self { sender }, receiver)
    }
}

impl Transport for ChannelTransport {
    fn send(&self, event: &Event) -> Result<(), TransportError> {
        self.sender
            .send(Outbound::Event(event.clone()))
            .map_err(|_| TransportError::Closed)
    }

    fn close(&self) {
        // The writer may already be gone, which is the state we want anyway.
        let _ = self.sender.send(Outbound::Close);
    }
}

/// Connection information (no redundant connection_id)
#[derive(Clone)]
pub struct ConnectionInfo {
    pub user_id: UserId,
    pub transport: Arc<dyn Transport>,
}

/// Process-wide membership of live connections, indexed both ways.
///
/// A connection id appears under at most one user at a time, and a user whose
/// last connection leaves is removed from the index entirely.
pub struct ConnectionRegistry {
    /// Primary storage: lookup by connection_id for registration/cleanup - O(1)
    connections: DashMap<ConnectionId, ConnectionInfo>,

    /// Secondary index: fast lookup by user_id for message routing - O(1)
    user_index: DashMap<UserId, HashSet<ConnectionId>>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self {
            connections: DashMap::new(),
            user_index: DashMap::new(),
        }
    }

    /// Add `connection_id` to the membership set of `user_id`.
    ///
    /// Joining again under a different user moves the connection.
    pub fn join(
        &self,
        user_id: UserId,
        connection_id: ConnectionId,
        transport: Arc<dyn Transport>,
    ) {
        let previous = self.connections.insert(
            connection_id.clone(),
            ConnectionInfo {
                user_id: user_id.clone(),
                transport,
            },
        );

        if let Some(previous) = previous {
            if previous.user_id != user_id {
                warn!(
                    "Connection {} moved from user {} to user {}",
                    connection_id, previous.user_id, user_id
                );
                self.remove_from_index(&previous.user_id, &connection_id);
            }
        }

        self.user_index
            .entry(user_id)
            .or_default()
            .insert(connection_id);
    }

    /// Remove `connection_id` from whichever user holds it.
    ///
    /// Returns `false` when the connection was not registered; that is not an error.
    pub fn leave(&self, connection_id: &ConnectionId) -> bool {
        match self.connections.remove(connection_id) {
            Some((_, info)) => {
                self.remove_from_index(&info.user_id, connection_id);
                true
            }
            None => {
                trace!("Connection {connection_id} was not registered");
                false
            }
        }
    }

    /// Snapshot of the connections currently joined under `user_id`.
    pub fn members_of(&self, user_id: &str) -> HashSet<ConnectionId> {
        self.user_index
            .get(user_id)
            .map(|members| members.clone())
            .unwrap_or_default()
    }

    pub fn is_present(&self, user_id: &str) -> bool {
        self.user_index
            .get(user_id)
            .is_some_and(|members| !members.is_empty())
    }

    /// User owning `connection_id`, if it is registered.
    pub fn owner_of(&self, connection_id: &ConnectionId) -> Option<UserId> {
        self.connections
            .get(connection_id)
            .map(|info| info.user_id.clone())
    }

    /// Snapshot of the transports of `user_id`. No registry lock is held once this returns.
    pub fn transports_of(&self, user_id: &str) -> Vec<(ConnectionId, Arc<dyn Transport>)> {
        self.members_of(user_id)
            .into_iter()
            .filter_map(|connection_id| {
                let transport = self
                    .connections
                    .get(&connection_id)
                    .map(|info| Arc::clone(&info.transport))?;
                Some((connection_id, transport))
            })
            .collect()
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    /// Number of users with at least one live connection.
    pub fn user_count(&self) -> usize {
        self.user_index.len()
    }

    fn remove_from_index(&self, user_id: &str, connection_id: &ConnectionId) {
        if let Some(mut members) = self.user_index.get_mut(user_id) {
            members.remove(connection_id);
        }
        // Atomic check-and-remove so a concurrent join never loses its entry.
        self.user_index
            .remove_if(user_id, |_, members| members.is_empty());
    }
}

impl Default for ConnectionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

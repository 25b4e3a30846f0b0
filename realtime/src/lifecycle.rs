use crate::connection::{ConnectionId, ConnectionRegistry, Transport, UserId};
use crate::identity::{IdentityVerifier, Rejection};
use crate::message::{ClientEvent, Event};
use crate::router::EventRouter;
use chrono::{DateTime, Utc};
use log::*;
use std::sync::Arc;
use std::time::Duration;

/// Default time a new connection has to present its credential.
pub const DEFAULT_HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Connecting,
    Established,
    Closed,
}

/// One live transport session and where it is in its lifecycle.
pub struct Connection {
    id: ConnectionId,
    user_id: Option<UserId>,
    state: ConnectionState,
    created_at: DateTime<Utc>,
    transport: Arc<dyn Transport>,
}

impl Connection {
    pub fn id(&self) -> &ConnectionId {
        &self.id
    }

    /// Owning user, known only once the handshake succeeded.
    pub fn user_id(&self) -> Option<&UserId> {
        self.user_id.as_ref()
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Drives connections through `Connecting -> Established -> Closed`, keeping
/// the registry in step with each transition.
pub struct LifecycleManager {
    verifier: IdentityVerifier,
    registry: Arc<ConnectionRegistry>,
    router: Arc<EventRouter>,
    handshake_timeout: Duration,
}

impl LifecycleManager {
    pub fn new(
        verifier: IdentityVerifier,
        router: Arc<EventRouter>,
        handshake_timeout: Duration,
    ) -> Self {
        Self {
            verifier,
            registry: Arc::clone(router.registry()),
            router,
            handshake_timeout,
        }
    }

    pub fn handshake_timeout(&self) -> Duration {
        self.handshake_timeout
    }

    /// Accept a freshly opened transport. The connection starts out `Connecting`.
    pub fn open(&self, transport: Arc<dyn Transport>) -> Connection {
        let connection = Connection {
            id: ConnectionId::new(),
            user_id: None,
            state: ConnectionState::Connecting,
            created_at: Utc::now(),
            transport,
        };
        debug!("Opened connection {}", connection.id);
        connection
    }

    /// Run the handshake for `connection` with the credential it presented.
    ///
    /// On success the connection joins the registry and is acknowledged. On
    /// failure the client receives an `error` event and the transport is closed.
    pub fn authenticate(
        &self,
        connection: &mut Connection,
        credential: Option<&str>,
    ) -> Result<UserId, Rejection> {
        match connection.state {
            ConnectionState::Established => {
                if let Some(user_id) = &connection.user_id {
                    debug!("Connection {} is already authenticated", connection.id);
                    return Ok(user_id.clone());
                }
            }
            ConnectionState::Closed => return Err(Rejection::ConnectionClosed),
            ConnectionState::Connecting => {}
        }

        let verified = match credential {
            Some(credential) => self.verifier.verify(credential),
            None => Err(Rejection::MissingCredential),
        };

        let user_id = match verified {
            Ok(user_id) => user_id,
            Err(rejection) => {
                self.reject(connection, rejection);
                return Err(rejection);
            }
        };

        self.registry.join(
            user_id.clone(),
            connection.id.clone(),
            Arc::clone(&connection.transport),
        );
        connection.user_id = Some(user_id.clone());
        connection.state = ConnectionState::Established;

        if let Err(e) = connection.transport.send(&Event::connected()) {
            warn!(
                "Failed to acknowledge connection {} of user {user_id}: {e}",
                connection.id
            );
            self.close(connection);
            connection.transport.close();
            return Err(Rejection::ConnectionClosed);
        }

        info!("User {user_id} connected on {}", connection.id);
        Ok(user_id)
    }

    /// Refuse a connection that is still handshaking: send the reason, then close.
    pub fn reject(&self, connection: &mut Connection, rejection: Rejection) {
        if connection.state != ConnectionState::Connecting {
            return;
        }

        info!(
            "Rejecting connection {}: {}",
            connection.id,
            rejection.code()
        );
        let event = Event::AuthError {
            message: rejection.to_string(),
            reason: rejection.code().to_string(),
        };
        if let Err(e) = connection.transport.send(&event) {
            debug!(
                "Could not tell connection {} why it was rejected: {e}",
                connection.id
            );
        }
        connection.transport.close();
        connection.state = ConnectionState::Closed;
    }

    /// True while `connection` is established and still registered to its user.
    ///
    /// A connection evicted by the router (a failed push or a forced logout)
    /// stays `Established` locally but is no longer live.
    pub fn is_live(&self, connection: &Connection) -> bool {
        connection.state == ConnectionState::Established
            && connection.user_id.is_some()
            && self.registry.owner_of(&connection.id) == connection.user_id
    }

    /// Handle one event sent by the client, returning how many connections were notified.
    pub fn handle_client_event(&self, connection: &Connection, event: ClientEvent) -> usize {
        let Some(user_id) = connection
            .user_id
            .as_ref()
            .filter(|_| self.is_live(connection))
        else {
            trace!(
                "Ignoring client event on connection {} that is not live",
                connection.id
            );
            return 0;
        };

        match event {
            ClientEvent::Typing {
                sender_id,
                receiver_id,
            } => {
                if let Some(claimed) = sender_id.as_ref().filter(|claimed| *claimed != user_id) {
                    warn!(
                        "Connection {} of user {user_id} claimed to type as {claimed}",
                        connection.id
                    );
                }
                let Some(receiver_id) = receiver_id else {
                    debug!("Typing event without receiver on {}", connection.id);
                    return 0;
                };

                self.router.route(
                    &receiver_id,
                    &Event::UserTyping {
                        sender_id: user_id.clone(),
                    },
                )
            }
            ClientEvent::Auth { .. } => {
                trace!("Connection {} is already authenticated", connection.id);
                0
            }
        }
    }

    /// Tear down `connection`. Returns `false` if it was already closed.
    pub fn close(&self, connection: &mut Connection) -> bool {
        if connection.state == ConnectionState::Closed {
            return false;
        }

        let was_member = self.registry.leave(&connection.id);
        connection.state = ConnectionState::Closed;

        match &connection.user_id {
            Some(user_id) if was_member => {
                info!("User {user_id} disconnected from {}", connection.id)
            }
            _ => debug!("Closed connection {}", connection.id),
        }
        true
    }
}

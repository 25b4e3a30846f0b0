use crate::connection::{Transport, UserId};
use crate::identity::Rejection;
use crate::lifecycle::{Connection, LifecycleManager};
use crate::message::ClientEvent;
use futures::{Stream, StreamExt};
use log::*;
use std::sync::Arc;

/// Drives a single connection from open to close over a stream of inbound text frames.
///
/// The transport layer owns the socket: it feeds received text frames in and
/// drains whatever the [`Transport`] is asked to push.
pub struct Session;

impl Session {
    /// Run the connection to completion and return it in its final, closed state.
    ///
    /// A credential passed as `query_credential` authenticates immediately.
    /// Otherwise the first frame must be an `auth` event and has to arrive
    /// within the handshake timeout.
    pub async fn run<S>(
        lifecycle: &LifecycleManager,
        transport: Arc<dyn Transport>,
        query_credential: Option<String>,
        mut inbound: S,
    ) -> Connection
    where
        S: Stream<Item = String> + Unpin + Send,
    {
        let mut connection = lifecycle.open(transport);

        let handshake = match query_credential {
            Some(credential) => lifecycle.authenticate(&mut connection, Some(&credential)),
            None => Self::handshake(lifecycle, &mut connection, &mut inbound).await,
        };

        if let Ok(user_id) = handshake {
            Self::serve(lifecycle, &connection, &user_id, &mut inbound).await;
        }

        lifecycle.close(&mut connection);
        connection
    }

    async fn handshake<S>(
        lifecycle: &LifecycleManager,
        connection: &mut Connection,
        inbound: &mut S,
    ) -> Result<UserId, Rejection>
    where
        S: Stream<Item = String> + Unpin + Send,
    {
        let first = tokio::time::timeout(lifecycle.handshake_timeout(), inbound.next()).await;

        match first {
            Err(_) => {
                lifecycle.reject(connection, Rejection::HandshakeTimeout);
                Err(Rejection::HandshakeTimeout)
            }
            Ok(None) => {
                debug!("Connection {} went away during handshake", connection.id());
                Err(Rejection::ConnectionClosed)
            }
            Ok(Some(frame)) => match serde_json::from_str::<ClientEvent>(&frame) {
                Ok(ClientEvent::Auth { token }) => lifecycle.authenticate(connection, Some(&token)),
                Ok(_) | Err(_) => lifecycle.authenticate(connection, None),
            },
        }
    }

    async fn serve<S>(
        lifecycle: &LifecycleManager,
        connection: &Connection,
        user_id: &UserId,
        inbound: &mut S,
    ) where
        S: Stream<Item = String> + Unpin + Send,
    {
        while let Some(frame) = inbound.next().await {
            if !lifecycle.is_live(connection) {
                debug!(
                    "Connection {} of user {user_id} was removed by the server, ending session",
                    connection.id()
                );
                break;
            }

            match serde_json::from_str::<ClientEvent>(&frame) {
                Ok(event) => {
                    lifecycle.handle_client_event(connection, event);
                }
                Err(e) => {
                    debug!("Ignoring unparsable frame from user {user_id}: {e}");
                }
            }
        }
    }
}

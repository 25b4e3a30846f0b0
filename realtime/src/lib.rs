//! Real-time delivery for SecureChat.
//!
//! This crate keeps every live client connection bound to the user it
//! authenticated as, and pushes new messages, typing indicators and forced
//! logouts to all of that user's devices.
//!
//! # Architecture
//!
//! - **Identity verification**: connections present an HS256 bearer credential,
//!   either as a `token` query parameter or as a first `auth` frame.
//! - **Multi-device registry**: a user may hold any number of connections. The
//!   registry keeps a dual index (connection -> user, user -> connections) in
//!   sharded DashMaps; a user whose last connection leaves disappears from it.
//! - **Persist, then notify**: the delivery coordinator stores a message before
//!   routing it. If the receiver is offline the event is dropped and the message
//!   waits in storage for the next history fetch.
//! - **Transport agnostic**: pushes go through the [`Transport`](connection::Transport)
//!   trait. The web layer implements it with an unbounded channel drained by
//!   the socket writer task, so a slow client never stalls routing.
//!
//! # Message Flow
//!
//! 1. Client opens `/ws` and presents its credential
//! 2. `LifecycleManager` verifies it, joins the registry and sends `connected`
//! 3. Another user calls `POST /api/messages`
//! 4. `DeliveryCoordinator` persists the message through its `MessageStore`
//! 5. `EventRouter` pushes `new_message` to each of the receiver's connections
//! 6. When the socket closes, the connection leaves the registry
//!
//! # Modules
//!
//! - `identity`: credential issuance and verification
//! - `connection`: `ConnectionRegistry`, `Transport` and `ConnectionId`
//! - `router`: per-user fan-out with dead connection reaping
//! - `delivery`: persist-then-notify for new messages
//! - `lifecycle`: per-connection state machine
//! - `session`: drives one connection over a stream of inbound frames
//! - `message`: wire events in both directions
//! - `domain_event_handler`: bridge from domain events to pushes

pub mod connection;
pub mod delivery;
pub mod domain_event_handler;
pub mod identity;
pub mod lifecycle;
pub mod message;
pub mod router;
pub mod session;

pub use domain_event_handler::RealtimeEventHandler;
pub use session::Session;

use connection::ConnectionRegistry;
use delivery::{DeliveryCoordinator, MessageStore};
use identity::IdentityVerifier;
use lifecycle::LifecycleManager;
use router::EventRouter;
use std::sync::Arc;
use std::time::Duration;

/// Wires the real-time components together around one shared registry.
pub struct Hub {
    verifier: IdentityVerifier,
    registry: Arc<ConnectionRegistry>,
    router: Arc<EventRouter>,
    lifecycle: LifecycleManager,
    delivery: DeliveryCoordinator,
}

impl Hub {
    pub fn new(
        verifier: IdentityVerifier,
        store: Arc<dyn MessageStore>,
        handshake_timeout: Duration,
    ) -> Self {
        let registry = Arc::new(ConnectionRegistry::new());
        let router = Arc::new(EventRouter::new(Arc::clone(&registry)));
        let lifecycle =
            LifecycleManager::new(verifier.clone(), Arc::clone(&router), handshake_timeout);
        let delivery = DeliveryCoordinator::new(store, Arc::clone(&router));

        Self {
            verifier,
            registry,
            router,
            lifecycle,
            delivery,
        }
    }

    pub fn verifier(&self) -> &IdentityVerifier {
        &self.verifier
    }

    pub fn registry(&self) -> &Arc<ConnectionRegistry> {
        &self.registry
    }

    pub fn router(&self) -> &Arc<EventRouter> {
        &self.router
    }

    pub fn lifecycle(&self) -> &LifecycleManager {
        &self.lifecycle
    }

    pub fn delivery(&self) -> &DeliveryCoordinator {
        &self.delivery
    }

    /// Handler to register with the domain `EventPublisher`.
    pub fn event_handler(&self) -> RealtimeEventHandler {
        RealtimeEventHandler::new(Arc::clone(&self.router))
    }
}

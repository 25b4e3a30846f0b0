//! Event system infrastructure for SecureChat.
//!
//! This crate provides the event system that enables loose coupling between
//! domain logic and infrastructure concerns (like real-time notifications).
//!
//! # Architecture
//!
//! - **DomainEvent**: Enum representing all business events in the system
//! - **EventHandler**: Trait for implementing event handlers
//! - **EventPublisher**: Publishes events to registered handlers
//!
//! This crate has no dependencies on internal crates (entity, domain, etc.),
//! avoiding circular dependencies.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

/// A type alias that represents any Entity's internal id field data type.
/// This matches the definition in the entity crate to maintain compatibility.
pub type Id = Uuid;

/// Domain events that represent business-level changes in the system.
/// These events are emitted when domain operations complete successfully.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainEvent {
    /// Emitted once a user account and everything it owned has been removed.
    /// Live connections of that user are logged out and closed.
    AccountDeleted {
        /// ID of the deleted user (the row no longer exists).
        user_id: Id,
    },
}

/// Trait for handling domain events.
/// Implementations can perform side effects like sending notifications,
/// updating caches, logging, etc.
#[async_trait]
pub trait EventHandler: Send + Sync {
    async fn handle(&self, event: &DomainEvent);
}

/// Publishes domain events to registered handlers.
/// Handlers are called sequentially in registration order.
#[derive(Clone)]
pub struct EventPublisher {
    handlers: Arc<Vec<Arc<dyn EventHandler>>>,
}

impl EventPublisher {
    pub fn new() -> Self {
        Self {
            handlers: Arc::new(Vec::new()),
        }
    }

    /// Register a new event handler.
    /// Note: This creates a new publisher instance with the additional handler.
    /// Store the returned publisher in your application state.
    pub fn with_handler(mut self, handler: Arc<dyn EventHandler>) -> Self {
        let mut handlers = (*self.handlers).clone();
        handlers.push(handler);
        self.handlers = Arc::new(handlers);
        self
    }

    /// Publish an event to all registered handlers.
    /// Handlers are called sequentially. If a handler panics or errors,
    /// we log it but continue with remaining handlers.
    pub async fn publish(&self, event: DomainEvent) {
        for handler in self.handlers.iter() {
            handler.handle(&event).await;
        }
    }
}

impl Default for EventPublisher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        seen: Mutex<Vec<DomainEvent>>,
    }

    #[async_trait]
    impl EventHandler for Recorder {
        async fn handle(&self, event: &DomainEvent) {
            self.seen.lock().unwrap().push(event.clone());
        }
    }

    #[tokio::test]
    async fn publish_reaches_every_registered_handler() {
        let first = Arc::new(Recorder::default());
        let second = Arc::new(Recorder::default());
        let publisher = EventPublisher::new()
            .with_handler(first.clone())
            .with_handler(second.clone());
        let event = DomainEvent::AccountDeleted {
            user_id: Uuid::new_v4(),
        };

        publisher.publish(event.clone()).await;

        assert_eq!(*first.seen.lock().unwrap(), vec![event.clone()]);
        assert_eq!(*second.seen.lock().unwrap(), vec![event]);
    }

    #[tokio::test]
    async fn publish_without_handlers_is_a_no_op() {
        EventPublisher::default()
            .publish(DomainEvent::AccountDeleted {
                user_id: Uuid::new_v4(),
            })
            .await;
    }
}

use crate::connection::UserId;
use crate::message::{EncryptedPayload, Event, Message};
use crate::router::EventRouter;
use async_trait::async_trait;
use chrono::{SubsecRound, Utc};
use log::*;
use std::error::Error as StdError;
use std::sync::Arc;
use uuid::Uuid;

pub type StoreError = Box<dyn StdError + Send + Sync>;

/// Durable storage for messages. `insert_message` either stores the whole
/// message or nothing.
#[async_trait]
pub trait MessageStore: Send + Sync {
    async fn insert_message(&self, message: &Message) -> Result<(), StoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    #[error("failed to persist message")]
    Persistence(#[source] StoreError),
}

/// Persists new messages and only then notifies the receiver's live connections.
pub struct DeliveryCoordinator {
    store: Arc<dyn MessageStore>,
    router: Arc<EventRouter>,
}

impl DeliveryCoordinator {
    pub fn new(store: Arc<dyn MessageStore>, router: Arc<EventRouter>) -> Self {
        Self { store, router }
    }

    pub async fn deliver(
        &self,
        sender_id: &UserId,
        receiver_id: &UserId,
        payload: EncryptedPayload,
    ) -> Result<Message, DeliveryError> {
        let message = Message {
            id: Uuid::new_v4(),
            sender_id: sender_id.clone(),
            receiver_id: receiver_id.clone(),
            encrypted_content: payload.encrypted_content,
            iv: payload.iv,
            sender_public_key: payload.sender_public_key,
            // Storage keeps microseconds; pushed and persisted copies must agree.
            timestamp: Utc::now().trunc_subsecs(6),
            is_delivered: false,
            is_read: false,
        };

        self.store.insert_message(&message).await.map_err(|e| {
            error!("Failed to persist message {}: {e}", message.id);
            DeliveryError::Persistence(e)
        })?;

        let notified = self
            .router
            .route(receiver_id, &Event::NewMessage(message.clone()));
        debug!(
            "Message {} stored, notified {notified} connection(s) of user {receiver_id}",
            message.id
        );

        Ok(message)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::connection::tests::RecordingTransport;
    use crate::connection::{ConnectionId, ConnectionRegistry};
    use std::sync::Mutex;

    #[derive(Default)]
    pub(crate) struct InMemoryStore {
        pub(crate) messages: Mutex<Vec<Message>>,
    }

    #[async_trait]
    impl MessageStore for InMemoryStore {
        async fn insert_message(&self, message: &Message) -> Result<(), StoreError> {
            self.messages.lock().unwrap().push(message.clone());
            Ok(())
        }
    }

    struct FailingStore;

    #[async_trait]
    impl MessageStore for FailingStore {
        async fn insert_message(&self, _message: &Message) -> Result<(), StoreError> {
            Err("database unavailable".into())
        }
    }

    pub(crate) fn payload() -> EncryptedPayload {
        EncryptedPayload {
            encrypted_content: "ciphertext".to_string(),
            iv: "iv".to_string(),
            sender_public_key: "pk".to_string(),
        }
    }

    fn router_with(registry: &Arc<ConnectionRegistry>) -> Arc<EventRouter> {
        Arc::new(EventRouter::new(Arc::clone(registry)))
    }

    #[tokio::test]
    async fn deliver_to_an_offline_receiver_stores_and_returns_the_message() {
        let store = Arc::new(InMemoryStore::default());
        let registry = Arc::new(ConnectionRegistry::new());
        let coordinator = DeliveryCoordinator::new(store.clone(), router_with(&registry));

        let message = coordinator
            .deliver(&"b".to_string(), &"a".to_string(), payload())
            .await
            .unwrap();

        assert_eq!(message.sender_id, "b");
        assert_eq!(message.receiver_id, "a");
        assert!(!message.is_delivered);
        assert!(!message.is_read);
        assert_eq!(*store.messages.lock().unwrap(), vec![message]);
    }

    #[tokio::test]
    async fn message_timestamps_carry_whole_microseconds() {
        let store = Arc::new(InMemoryStore::default());
        let registry = Arc::new(ConnectionRegistry::new());
        let coordinator = DeliveryCoordinator::new(store, router_with(&registry));

        let message = coordinator
            .deliver(&"b".to_string(), &"a".to_string(), payload())
            .await
            .unwrap();

        assert_eq!(message.timestamp.timestamp_subsec_nanos() % 1_000, 0);
    }

    #[tokio::test]
    async fn deliver_pushes_one_identical_event_per_connection() {
        let store = Arc::new(InMemoryStore::default());
        let registry = Arc::new(ConnectionRegistry::new());
        let devices: Vec<Arc<RecordingTransport>> = (0..3)
            .map(|_| Arc::new(RecordingTransport::default()))
            .collect();
        for device in &devices {
            registry.join("a".to_string(), ConnectionId::new(), device.clone());
        }
        let coordinator = DeliveryCoordinator::new(store, router_with(&registry));

        let message = coordinator
            .deliver(&"b".to_string(), &"a".to_string(), payload())
            .await
            .unwrap();

        for device in devices {
            assert_eq!(device.sent(), vec![Event::NewMessage(message.clone())]);
        }
    }

    #[tokio::test]
    async fn deliver_never_routes_when_persistence_fails() {
        let registry = Arc::new(ConnectionRegistry::new());
        let device = Arc::new(RecordingTransport::default());
        registry.join("a".to_string(), ConnectionId::new(), device.clone());
        let coordinator = DeliveryCoordinator::new(Arc::new(FailingStore), router_with(&registry));

        let result = coordinator
            .deliver(&"b".to_string(), &"a".to_string(), payload())
            .await;

        assert!(matches!(result, Err(DeliveryError::Persistence(_))));
        assert!(device.sent().is_empty());
    }

    #[tokio::test]
    async fn deliver_succeeds_even_if_every_push_fails() {
        let store = Arc::new(InMemoryStore::default());
        let registry = Arc::new(ConnectionRegistry::new());
        registry.join(
            "a".to_string(),
            ConnectionId::new(),
            Arc::new(RecordingTransport::dead()),
        );
        let coordinator = DeliveryCoordinator::new(store.clone(), router_with(&registry));

        let result = coordinator
            .deliver(&"b".to_string(), &"a".to_string(), payload())
            .await;

        assert!(result.is_ok());
        assert_eq!(store.messages.lock().unwrap().len(), 1);
        assert!(!registry.is_present("a"));
    }
}

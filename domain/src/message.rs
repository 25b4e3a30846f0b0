use crate::error::Error;
use crate::{messages, user, Id};
use async_trait::async_trait;
use chrono::Utc;
use entity_api::message;
use log::*;
use realtime::delivery::{MessageStore, StoreError};
use realtime::message::{EncryptedPayload, Message};
use realtime::Hub;
use sea_orm::DatabaseConnection;
use std::sync::Arc;

/// Message storage backed by the `messages` table.
pub struct DbMessageStore {
    db: Arc<DatabaseConnection>,
}

impl DbMessageStore {
    pub fn new(db: &Arc<DatabaseConnection>) -> Self {
        Self {
            db: Arc::clone(db),
        }
    }
}

#[async_trait]
impl MessageStore for DbMessageStore {
    async fn insert_message(&self, message: &Message) -> Result<(), StoreError> {
        let model = to_model(message)?;
        message::create(self.db.as_ref(), model).await?;
        Ok(())
    }
}

fn to_model(message: &Message) -> Result<messages::Model, StoreError> {
    Ok(messages::Model {
        id: message.id,
        sender_id: Id::parse_str(&message.sender_id)?,
        receiver_id: Id::parse_str(&message.receiver_id)?,
        encrypted_content: message.encrypted_content.clone(),
        iv: message.iv.clone(),
        sender_public_key: message.sender_public_key.clone(),
        timestamp: message.timestamp.into(),
        is_delivered: message.is_delivered,
        is_read: message.is_read,
    })
}

fn from_model(model: messages::Model) -> Message {
    Message {
        id: model.id,
        sender_id: model.sender_id.to_string(),
        receiver_id: model.receiver_id.to_string(),
        encrypted_content: model.encrypted_content,
        iv: model.iv,
        sender_public_key: model.sender_public_key,
        timestamp: model.timestamp.with_timezone(&Utc),
        is_delivered: model.is_delivered,
        is_read: model.is_read,
    }
}

/// Store a message from `sender_id` and push it to the receiver's live connections.
pub async fn send(
    db: &DatabaseConnection,
    hub: &Hub,
    sender_id: Id,
    receiver_id: Id,
    payload: EncryptedPayload,
) -> Result<Message, Error> {
    user::find_by_id(db, receiver_id).await.inspect_err(|_| {
        debug!("Message from {sender_id} to {receiver_id} refused, receiver lookup failed");
    })?;

    Ok(hub
        .delivery()
        .deliver(&sender_id.to_string(), &receiver_id.to_string(), payload)
        .await?)
}

/// Messages exchanged between two users, oldest first.
pub async fn conversation(
    db: &DatabaseConnection,
    user_id: Id,
    other_user_id: Id,
    limit: u64,
) -> Result<Vec<Message>, Error> {
    Ok(message::find_between(db, user_id, other_user_id, limit)
        .await?
        .into_iter()
        .map(from_model)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn models_and_messages_convert_both_ways() {
        let message = Message {
            id: Id::new_v4(),
            sender_id: Id::new_v4().to_string(),
            receiver_id: Id::new_v4().to_string(),
            encrypted_content: "ciphertext".to_owned(),
            iv: "iv".to_owned(),
            sender_public_key: "public-key".to_owned(),
            timestamp: Utc::now(),
            is_delivered: false,
            is_read: false,
        };

        let model = to_model(&message).unwrap();

        assert_eq!(from_model(model), message);
    }

    #[test]
    fn to_model_rejects_non_uuid_identities() {
        let message = Message {
            id: Id::new_v4(),
            sender_id: "not-a-uuid".to_owned(),
            receiver_id: Id::new_v4().to_string(),
            encrypted_content: String::new(),
            iv: String::new(),
            sender_public_key: String::new(),
            timestamp: Utc::now(),
            is_delivered: false,
            is_read: false,
        };

        assert!(to_model(&message).is_err());
    }
}

#[cfg(test)]
// We need to gate seaORM's mock feature behind conditional compilation because
// the feature removes the Clone trait implementation from seaORM's DatabaseConnection.
// see https://github.com/SeaQL/sea-orm/issues/830
#[cfg(feature = "mock")]
mod mock_tests {
    use super::*;
    use crate::error::{DomainErrorKind, ValidationErrorKind};
    use crate::users;
    use realtime::connection::{ChannelTransport, ConnectionId, Outbound};
    use realtime::identity::{IdentityVerifier, DEFAULT_VALIDITY_SECS};
    use realtime::message::Event;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::time::Duration;

    fn payload() -> EncryptedPayload {
        EncryptedPayload {
            encrypted_content: "ciphertext".to_owned(),
            iv: "iv".to_owned(),
            sender_public_key: "public-key".to_owned(),
        }
    }

    fn user_model(id: Id) -> users::Model {
        users::Model {
            id,
            username: "bob".to_owned(),
            email: "bob@example.com".to_owned(),
            password_hash: "hash".to_owned(),
            public_key: "public-key".to_owned(),
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn send_to_an_unknown_user_is_refused_before_storing() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<users::Model>::new()])
                .into_connection(),
        );
        let hub = Hub::new(
            IdentityVerifier::new("secret", DEFAULT_VALIDITY_SECS),
            Arc::new(DbMessageStore::new(&db)),
            Duration::from_secs(10),
        );

        let result = send(&db, &hub, Id::new_v4(), Id::new_v4(), payload()).await;

        assert_eq!(
            result.map_err(|e| e.error_kind).err(),
            Some(DomainErrorKind::Validation(ValidationErrorKind::UserNotFound))
        );
    }

    #[tokio::test]
    async fn send_persists_then_notifies_the_receiver() {
        let sender_id = Id::new_v4();
        let receiver_id = Id::new_v4();
        let stored = messages::Model {
            id: Id::new_v4(),
            sender_id,
            receiver_id,
            encrypted_content: "ciphertext".to_owned(),
            iv: "iv".to_owned(),
            sender_public_key: "public-key".to_owned(),
            timestamp: Utc::now().into(),
            is_delivered: false,
            is_read: false,
        };
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[user_model(receiver_id)]])
                .append_query_results([[stored]])
                .into_connection(),
        );
        let hub = Hub::new(
            IdentityVerifier::new("secret", DEFAULT_VALIDITY_SECS),
            Arc::new(DbMessageStore::new(&db)),
            Duration::from_secs(10),
        );
        let (transport, mut outbound) = ChannelTransport::new();
        hub.registry().join(
            receiver_id.to_string(),
            ConnectionId::new(),
            Arc::new(transport),
        );

        let message = send(&db, &hub, sender_id, receiver_id, payload())
            .await
            .unwrap();

        assert_eq!(message.receiver_id, receiver_id.to_string());
        assert_eq!(
            outbound.try_recv().ok(),
            Some(Outbound::Event(Event::NewMessage(message)))
        );
    }
}

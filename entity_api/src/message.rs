use super::error::Error;
use entity::messages::{ActiveModel, Column, Entity, Model};
use entity::Id;
use log::*;
use sea_orm::{entity::prelude::*, Condition, ConnectionTrait, QueryOrder, QuerySelect, Set};

/// Store a message exactly as given, including its id and timestamp.
pub async fn create(db: &impl ConnectionTrait, message_model: Model) -> Result<Model, Error> {
    debug!(
        "New Message {} to be inserted from {} to {}",
        message_model.id, message_model.sender_id, message_model.receiver_id
    );

    let message_active_model: ActiveModel = ActiveModel {
        id: Set(message_model.id),
        sender_id: Set(message_model.sender_id),
        receiver_id: Set(message_model.receiver_id),
        encrypted_content: Set(message_model.encrypted_content),
        iv: Set(message_model.iv),
        sender_public_key: Set(message_model.sender_public_key),
        timestamp: Set(message_model.timestamp),
        is_delivered: Set(message_model.is_delivered),
        is_read: Set(message_model.is_read),
    };

    Ok(message_active_model.insert(db).await?)
}

/// Conversation between two users in both directions, oldest first.
pub async fn find_between(
    db: &impl ConnectionTrait,
    user_id: Id,
    other_user_id: Id,
    limit: u64,
) -> Result<Vec<Model>, Error> {
    Ok(Entity::find()
        .filter(
            Condition::any()
                .add(
                    Condition::all()
                        .add(Column::SenderId.eq(user_id))
                        .add(Column::ReceiverId.eq(other_user_id)),
                )
                .add(
                    Condition::all()
                        .add(Column::SenderId.eq(other_user_id))
                        .add(Column::ReceiverId.eq(user_id)),
                ),
        )
        .order_by_asc(Column::Timestamp)
        .limit(limit)
        .all(db)
        .await?)
}

#[cfg(test)]
// We need to gate seaORM's mock feature behind conditional compilation because
// the feature removes the Clone trait implementation from seaORM's DatabaseConnection.
// see https://github.com/SeaQL/sea-orm/issues/830
#[cfg(feature = "mock")]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn message_model(sender_id: Id, receiver_id: Id) -> Model {
        Model {
            id: Id::new_v4(),
            sender_id,
            receiver_id,
            encrypted_content: "ciphertext".to_owned(),
            iv: "iv".to_owned(),
            sender_public_key: "public-key".to_owned(),
            timestamp: chrono::Utc::now().into(),
            is_delivered: false,
            is_read: false,
        }
    }

    #[tokio::test]
    async fn create_returns_the_stored_message() -> Result<(), Error> {
        let message = message_model(Id::new_v4(), Id::new_v4());
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[message.clone()]])
            .into_connection();

        let stored = create(&db, message.clone()).await?;

        assert_eq!(stored, message);

        Ok(())
    }

    #[tokio::test]
    async fn find_between_returns_both_directions() -> Result<(), Error> {
        let alice = Id::new_v4();
        let bob = Id::new_v4();
        let sent = message_model(alice, bob);
        let received = message_model(bob, alice);
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[sent.clone(), received.clone()]])
            .into_connection();

        let conversation = find_between(&db, alice, bob, 1000).await?;

        assert_eq!(conversation, vec![sent, received]);

        Ok(())
    }
}

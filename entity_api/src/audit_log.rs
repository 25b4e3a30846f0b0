use super::error::Error;
use chrono::Utc;
use entity::audit_logs::{ActiveModel, Column, Entity, Model};
use entity::Id;
use log::*;
use sea_orm::{entity::prelude::*, ConnectionTrait, QueryOrder, QuerySelect, Set};

pub async fn create(
    db: &impl ConnectionTrait,
    audit_log_model: Model,
    user_id: Id,
) -> Result<Model, Error> {
    debug!(
        "New Audit Log to be inserted for user {user_id}: {}",
        audit_log_model.event_type
    );

    let audit_log_active_model: ActiveModel = ActiveModel {
        user_id: Set(user_id),
        event_type: Set(audit_log_model.event_type),
        chat_id: Set(audit_log_model.chat_id),
        device_info: Set(audit_log_model.device_info),
        timestamp: Set(Utc::now().into()),
        ..Default::default()
    };

    Ok(audit_log_active_model.insert(db).await?)
}

/// Most recent audit log entries of a user first.
pub async fn find_by_user(
    db: &impl ConnectionTrait,
    user_id: Id,
    limit: u64,
) -> Result<Vec<Model>, Error> {
    Ok(Entity::find()
        .filter(Column::UserId.eq(user_id))
        .order_by_desc(Column::Timestamp)
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

    #[tokio::test]
    async fn create_stamps_the_owner() -> Result<(), Error> {
        let user_id = Id::new_v4();
        let audit_log = Model {
            id: Id::new_v4(),
            user_id,
            event_type: "key_exchange".to_owned(),
            chat_id: Some("chat-1".to_owned()),
            device_info: None,
            timestamp: Utc::now().into(),
        };
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[audit_log.clone()]])
            .into_connection();

        let created = create(&db, audit_log.clone(), user_id).await?;

        assert_eq!(created.user_id, user_id);
        assert_eq!(created.event_type, "key_exchange");

        Ok(())
    }
}

use super::error::Error;
use chrono::Utc;
use entity::contacts::{ActiveModel, Column, Entity, Model};
use entity::Id;
use log::*;
use sea_orm::{entity::prelude::*, ConnectionTrait, QueryOrder, Set};

pub async fn create(db: &impl ConnectionTrait, user_id: Id, contact_id: Id) -> Result<Model, Error> {
    debug!("New Contact to be inserted: {user_id} -> {contact_id}");

    let contact_active_model: ActiveModel = ActiveModel {
        user_id: Set(user_id),
        contact_id: Set(contact_id),
        added_at: Set(Utc::now().into()),
        ..Default::default()
    };

    Ok(contact_active_model.insert(db).await?)
}

pub async fn find(
    db: &impl ConnectionTrait,
    user_id: Id,
    contact_id: Id,
) -> Result<Option<Model>, Error> {
    Ok(Entity::find()
        .filter(Column::UserId.eq(user_id))
        .filter(Column::ContactId.eq(contact_id))
        .one(db)
        .await?)
}

pub async fn find_by_user(db: &impl ConnectionTrait, user_id: Id) -> Result<Vec<Model>, Error> {
    Ok(Entity::find()
        .filter(Column::UserId.eq(user_id))
        .order_by_asc(Column::AddedAt)
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
    async fn create_returns_the_new_contact() -> Result<(), Error> {
        let contact = Model {
            id: Id::new_v4(),
            user_id: Id::new_v4(),
            contact_id: Id::new_v4(),
            added_at: Utc::now().into(),
        };
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[contact.clone()]])
            .into_connection();

        let created = create(&db, contact.user_id, contact.contact_id).await?;

        assert_eq!(created, contact);

        Ok(())
    }

    #[tokio::test]
    async fn find_returns_none_when_absent() -> Result<(), Error> {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<Model>::new()])
            .into_connection();

        assert_eq!(find(&db, Id::new_v4(), Id::new_v4()).await?, None);

        Ok(())
    }
}

use crate::error::Error;
use crate::{user, users, Id};
use entity_api::{contact, user as user_api};
use log::*;
use sea_orm::DatabaseConnection;

/// Outcome of adding a contact. Adding one twice is not an error.
#[derive(Debug, PartialEq, Eq)]
pub enum AddOutcome {
    Added,
    AlreadyExists,
}

/// Add `contact_id` to the contact list of `user_id`.
pub async fn add(db: &DatabaseConnection, user_id: Id, contact_id: Id) -> Result<AddOutcome, Error> {
    user::find_by_id(db, contact_id).await?;

    if contact::find(db, user_id, contact_id).await?.is_some() {
        return Ok(AddOutcome::AlreadyExists);
    }

    contact::create(db, user_id, contact_id).await?;
    info!("User {user_id} added contact {contact_id}");
    Ok(AddOutcome::Added)
}

/// The users on the contact list of `user_id`, oldest contact first.
pub async fn list(db: &DatabaseConnection, user_id: Id) -> Result<Vec<users::Model>, Error> {
    let contact_ids: Vec<Id> = contact::find_by_user(db, user_id)
        .await?
        .into_iter()
        .map(|c| c.contact_id)
        .collect();

    let mut contacts = user_api::find_by_ids(db, contact_ids.clone()).await?;
    contacts.sort_by_key(|u| contact_ids.iter().position(|id| *id == u.id));
    Ok(contacts)
}

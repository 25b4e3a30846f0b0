use log::*;
use sea_orm::ConnectionTrait;

pub use entity::{audit_logs, contacts, messages, users, Id};

pub mod audit_log;
pub mod contact;
pub mod error;
pub mod message;
pub mod user;

/// Parse a user supplied identifier, rejecting anything that is not a UUID.
pub fn parse_id(id: &str) -> Result<Id, error::Error> {
    Id::parse_str(id).map_err(|_| error::Error {
        source: None,
        error_kind: error::EntityApiErrorKind::InvalidQueryTerm,
    })
}

/// Populate an empty database with two demo users who have each other as contacts.
pub async fn seed_database(db: &impl ConnectionTrait) -> Result<(), error::Error> {
    let now = chrono::Utc::now();

    let alice = user::create(
        db,
        users::Model {
            id: Id::nil(),
            username: "alice".to_owned(),
            email: "alice@securechat.dev".to_owned(),
            password_hash: "password".to_owned(),
            public_key: "demo-public-key-alice".to_owned(),
            created_at: now.into(),
        },
    )
    .await?;

    let bob = user::create(
        db,
        users::Model {
            id: Id::nil(),
            username: "bob".to_owned(),
            email: "bob@securechat.dev".to_owned(),
            password_hash: "password".to_owned(),
            public_key: "demo-public-key-bob".to_owned(),
            created_at: now.into(),
        },
    )
    .await?;

    contact::create(db, alice.id, bob.id).await?;
    contact::create(db, bob.id, alice.id).await?;

    info!("Seeded demo users {} and {}", alice.username, bob.username);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use error::EntityApiErrorKind;

    #[test]
    fn parse_id_accepts_uuids_only() {
        let id = Id::new_v4();

        assert_eq!(parse_id(&id.to_string()), Ok(id));
        assert_eq!(
            parse_id("not-a-uuid").map_err(|e| e.error_kind),
            Err(EntityApiErrorKind::InvalidQueryTerm)
        );
    }
}

//! Account removal.
//!
//! Deleting an account removes the user and every row that references them in
//! one transaction, then publishes [`DomainEvent::AccountDeleted`] so that any
//! live connections of the user are logged out.

use crate::error::{AuthErrorKind, Error, ValidationErrorKind};
use crate::users;
use entity_api::user;
use events::{DomainEvent, EventPublisher};
use log::*;
use sea_orm::DatabaseConnection;

/// Text the user must type to confirm that the account should go.
pub const DELETE_CONFIRMATION: &str = "DELETE";

pub async fn delete(
    db: &DatabaseConnection,
    event_publisher: &EventPublisher,
    account: &users::Model,
    password: &str,
    confirmation: &str,
) -> Result<(), Error> {
    if user::verify_password(password, &account.password_hash)
        .await
        .is_err()
    {
        info!("Account deletion for user {} refused, wrong password", account.id);
        return Err(Error::auth(AuthErrorKind::InvalidPassword));
    }

    if confirmation != DELETE_CONFIRMATION {
        return Err(Error::validation(ValidationErrorKind::ConfirmationMismatch));
    }

    user::delete_with_related(db, account.id).await.map_err(|e| {
        error!("Failed to delete account {}: {e}", account.id);
        Error::from(e)
    })?;

    warn!("Account {} deleted", account.id);
    event_publisher
        .publish(DomainEvent::AccountDeleted {
            user_id: account.id,
        })
        .await;

    Ok(())
}

#[cfg(test)]
// We need to gate seaORM's mock feature behind conditional compilation because
// the feature removes the Clone trait implementation from seaORM's DatabaseConnection.
// see https://github.com/SeaQL/sea-orm/issues/830
#[cfg(feature = "mock")]
mod tests {
    use super::*;
    use crate::error::DomainErrorKind;
    use crate::Id;
    use async_trait::async_trait;
    use events::EventHandler;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct Recorder(Mutex<Vec<DomainEvent>>);

    #[async_trait]
    impl EventHandler for Recorder {
        async fn handle(&self, event: &DomainEvent) {
            self.0.lock().unwrap().push(event.clone());
        }
    }

    fn account() -> users::Model {
        users::Model {
            id: Id::new_v4(),
            username: "alice".to_owned(),
            email: "alice@example.com".to_owned(),
            password_hash: user::generate_hash("correct horse".to_owned()),
            public_key: "public-key".to_owned(),
            created_at: chrono::Utc::now().into(),
        }
    }

    fn exec(rows_affected: u64) -> MockExecResult {
        MockExecResult {
            last_insert_id: 0,
            rows_affected,
        }
    }

    #[tokio::test]
    async fn a_wrong_password_keeps_the_account() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let recorder = Arc::new(Recorder::default());
        let publisher = EventPublisher::new().with_handler(recorder.clone());

        let result = delete(&db, &publisher, &account(), "wrong", "DELETE").await;

        assert_eq!(
            result.map_err(|e| e.error_kind).err(),
            Some(DomainErrorKind::Auth(AuthErrorKind::InvalidPassword))
        );
        assert!(recorder.0.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn the_confirmation_text_must_match_exactly() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let publisher = EventPublisher::new();

        let result = delete(&db, &publisher, &account(), "correct horse", "delete").await;

        assert_eq!(
            result.map_err(|e| e.error_kind).err(),
            Some(DomainErrorKind::Validation(
                ValidationErrorKind::ConfirmationMismatch
            ))
        );
    }

    #[tokio::test]
    async fn deleting_publishes_account_deleted() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([exec(3), exec(1), exec(0), exec(1)])
            .into_connection();
        let recorder = Arc::new(Recorder::default());
        let publisher = EventPublisher::new().with_handler(recorder.clone());
        let account = account();

        delete(&db, &publisher, &account, "correct horse", "DELETE")
            .await
            .unwrap();

        assert_eq!(
            *recorder.0.lock().unwrap(),
            vec![DomainEvent::AccountDeleted {
                user_id: account.id
            }]
        );
    }
}

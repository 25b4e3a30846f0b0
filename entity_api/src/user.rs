use super::error::{EntityApiErrorKind, Error};
use chrono::Utc;
use entity::users::{ActiveModel, Column, Entity, Model};
use entity::{audit_logs, contacts, messages, Id};
use log::*;
use password_auth;
use sea_orm::sea_query::{Expr, Func, LikeExpr};
use sea_orm::{
    entity::prelude::*, Condition, ConnectionTrait, QueryOrder, QuerySelect, Set,
    TransactionTrait,
};

/// Insert a new user. `user_model.password_hash` carries the plaintext password
/// and is hashed before it is stored.
pub async fn create(db: &impl ConnectionTrait, user_model: Model) -> Result<Model, Error> {
    debug!(
        "New User Model to be inserted: username={}, email={}",
        user_model.username, user_model.email
    );

    let now = Utc::now();
    let user_active_model: ActiveModel = ActiveModel {
        username: Set(user_model.username),
        email: Set(user_model.email),
        password_hash: Set(generate_hash(user_model.password_hash)),
        public_key: Set(user_model.public_key),
        created_at: Set(now.into()),
        ..Default::default()
    };

    Ok(user_active_model.insert(db).await?)
}

pub async fn find_by_email(db: &impl ConnectionTrait, email: &str) -> Result<Option<Model>, Error> {
    Ok(Entity::find()
        .filter(Column::Email.eq(email))
        .one(db)
        .await?)
}

pub async fn find_by_username(
    db: &impl ConnectionTrait,
    username: &str,
) -> Result<Option<Model>, Error> {
    Ok(Entity::find()
        .filter(Column::Username.eq(username))
        .one(db)
        .await?)
}

pub async fn find_by_id(db: &impl ConnectionTrait, id: Id) -> Result<Model, Error> {
    Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(Error::not_found)
}

pub async fn find_by_ids(db: &impl ConnectionTrait, ids: Vec<Id>) -> Result<Vec<Model>, Error> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    Ok(Entity::find()
        .filter(Column::Id.is_in(ids))
        .order_by_asc(Column::Username)
        .all(db)
        .await?)
}

/// Case-insensitive substring search over username and email, never returning
/// `exclude_id` (the user searching).
pub async fn search(
    db: &impl ConnectionTrait,
    query: &str,
    exclude_id: Id,
    limit: u64,
) -> Result<Vec<Model>, Error> {
    let pattern = contains_pattern(query);

    Ok(Entity::find()
        .filter(
            Condition::any()
                .add(
                    Expr::expr(Func::lower(Expr::col(Column::Username)))
                        .like(LikeExpr::new(pattern.as_str()).escape('\\')),
                )
                .add(
                    Expr::expr(Func::lower(Expr::col(Column::Email)))
                        .like(LikeExpr::new(pattern.as_str()).escape('\\')),
                ),
        )
        .filter(Column::Id.ne(exclude_id))
        .order_by_asc(Column::Username)
        .limit(limit)
        .all(db)
        .await?)
}

/// Lowercased `LIKE` pattern matching `query` anywhere, with `%`, `_` and `\` taken literally.
fn contains_pattern(query: &str) -> String {
    let mut pattern = String::with_capacity(query.len() + 2);
    pattern.push('%');
    for c in query.to_lowercase().chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

pub async fn delete(db: &impl ConnectionTrait, user_id: Id) -> Result<(), Error> {
    Entity::delete_by_id(user_id).exec(db).await?;
    Ok(())
}

/// Remove a user together with everything that references them, atomically:
/// messages sent or received, contacts in either direction and audit logs.
pub async fn delete_with_related(db: &impl TransactionTrait, user_id: Id) -> Result<(), Error> {
    let txn = db.begin().await?;

    let deleted_messages = messages::Entity::delete_many()
        .filter(
            Condition::any()
                .add(messages::Column::SenderId.eq(user_id))
                .add(messages::Column::ReceiverId.eq(user_id)),
        )
        .exec(&txn)
        .await?;

    let deleted_contacts = contacts::Entity::delete_many()
        .filter(
            Condition::any()
                .add(contacts::Column::UserId.eq(user_id))
                .add(contacts::Column::ContactId.eq(user_id)),
        )
        .exec(&txn)
        .await?;

    let deleted_audit_logs = audit_logs::Entity::delete_many()
        .filter(audit_logs::Column::UserId.eq(user_id))
        .exec(&txn)
        .await?;

    let deleted_user = Entity::delete_by_id(user_id).exec(&txn).await?;
    if deleted_user.rows_affected == 0 {
        // Dropping the transaction rolls it back.
        return Err(Error::not_found());
    }

    txn.commit().await?;

    info!(
        "Deleted user {user_id} with {} message(s), {} contact(s), {} audit log(s)",
        deleted_messages.rows_affected,
        deleted_contacts.rows_affected,
        deleted_audit_logs.rows_affected
    );

    Ok(())
}

pub async fn verify_password(password_to_verify: &str, password_hash: &str) -> Result<(), Error> {
    match password_auth::verify_password(password_to_verify, password_hash) {
        Ok(_) => Ok(()),
        Err(_) => Err(Error {
            source: None,
            error_kind: EntityApiErrorKind::RecordUnauthenticated,
        }),
    }
}

pub fn generate_hash(password: String) -> String {
    password_auth::generate_hash(password)
}

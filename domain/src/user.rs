use crate::error::{AuthErrorKind, Error, ValidationErrorKind};
use crate::jwt::{self, Jwt};
use crate::{users, Id};
use email_address::EmailAddress;
use entity_api::user;
use log::*;
use realtime::identity::IdentityVerifier;
use sea_orm::DatabaseConnection;

/// Searches shorter than this return nothing.
pub const MIN_SEARCH_LEN: usize = 2;

/// Everything a client supplies to open an account.
#[derive(Debug, Clone)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
    pub public_key: String,
}

/// Create an account and sign the new user in.
pub async fn register(
    db: &DatabaseConnection,
    verifier: &IdentityVerifier,
    registration: Registration,
) -> Result<(Jwt, users::Model), Error> {
    if !EmailAddress::is_valid(&registration.email) {
        return Err(Error::validation(ValidationErrorKind::InvalidEmail));
    }

    if user::find_by_email(db, &registration.email).await?.is_some() {
        info!("Registration refused, email already registered");
        return Err(Error::validation(ValidationErrorKind::EmailTaken));
    }

    if user::find_by_username(db, &registration.username)
        .await?
        .is_some()
    {
        info!(
            "Registration refused, username {} already taken",
            registration.username
        );
        return Err(Error::validation(ValidationErrorKind::UsernameTaken));
    }

    let created = user::create(
        db,
        users::Model {
            id: Id::nil(),
            username: registration.username,
            email: registration.email,
            password_hash: registration.password,
            public_key: registration.public_key,
            created_at: chrono::Utc::now().into(),
        },
    )
    .await?;

    info!("Registered user {}", created.id);
    let token = jwt::issue(verifier, created.id)?;
    Ok((token, created))
}

/// Exchange email and password for an access token.
pub async fn login(
    db: &DatabaseConnection,
    verifier: &IdentityVerifier,
    email: &str,
    password: &str,
) -> Result<(Jwt, users::Model), Error> {
    let Some(found) = user::find_by_email(db, email).await? else {
        debug!("Login attempt for unknown email");
        return Err(Error::auth(AuthErrorKind::InvalidCredentials));
    };

    if user::verify_password(password, &found.password_hash)
        .await
        .is_err()
    {
        debug!("Login attempt with wrong password for user {}", found.id);
        return Err(Error::auth(AuthErrorKind::InvalidCredentials));
    }

    let token = jwt::issue(verifier, found.id)?;
    Ok((token, found))
}

/// Resolve a bearer token to the user it was issued for.
pub async fn authenticate(
    db: &DatabaseConnection,
    verifier: &IdentityVerifier,
    token: &str,
) -> Result<users::Model, Error> {
    let subject = verifier.verify(token).map_err(|rejection| {
        debug!("Rejected bearer token: {}", rejection.code());
        Error::auth(AuthErrorKind::InvalidToken)
    })?;
    let user_id =
        Id::parse_str(&subject).map_err(|_| Error::auth(AuthErrorKind::InvalidToken))?;

    match user::find_by_id(db, user_id).await {
        Ok(found) => Ok(found),
        Err(e) => {
            let e = Error::from(e);
            if e.is_not_found() {
                Err(Error::auth(AuthErrorKind::UnknownUser))
            } else {
                Err(e)
            }
        }
    }
}

pub async fn find_by_id(db: &DatabaseConnection, id: Id) -> Result<users::Model, Error> {
    user::find_by_id(db, id).await.map_err(|e| {
        let e = Error::from(e);
        if e.is_not_found() {
            Error::validation(ValidationErrorKind::UserNotFound)
        } else {
            e
        }
    })
}

/// Users whose username or email contains `query`, never including `caller_id`.
pub async fn search(
    db: &DatabaseConnection,
    query: &str,
    caller_id: Id,
    limit: u64,
) -> Result<Vec<users::Model>, Error> {
    if query.chars().count() < MIN_SEARCH_LEN {
        return Ok(Vec::new());
    }

    Ok(user::search(db, query, caller_id, limit).await?)
}

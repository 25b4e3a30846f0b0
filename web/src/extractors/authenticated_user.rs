use crate::AppState;
use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
    response::{IntoResponse, Response},
};
use domain::error::{AuthErrorKind, DomainErrorKind, Error as DomainError};
use domain::users;
use log::*;

/// The user behind the `Authorization: Bearer <token>` header of a request.
pub(crate) struct AuthenticatedUser(pub users::Model);

#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Response;

    // Rejections carry the same `{"detail": ..}` body as every other API error.
    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = AppState::from_ref(state);

        let Some(token) = bearer_token(parts) else {
            trace!("Request to {} without a bearer token", parts.uri.path());
            return Err(crate::Error::from(DomainError {
                source: None,
                error_kind: DomainErrorKind::Auth(AuthErrorKind::InvalidToken),
            })
            .into_response());
        };

        domain::user::authenticate(state.db_conn_ref(), state.hub.verifier(), token)
            .await
            .map(AuthenticatedUser)
            .map_err(|e| crate::Error::from(e).into_response())
    }
}

fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

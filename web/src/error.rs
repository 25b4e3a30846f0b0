use std::error::Error as StdError;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use domain::error::{
    AuthErrorKind, DomainErrorKind, EntityErrorKind, Error as DomainError, ExternalErrorKind,
    InternalErrorKind, ValidationErrorKind,
};

use log::*;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug)]
pub struct Error(DomainError);

impl StdError for Error {}

impl std::fmt::Display for Error {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> core::result::Result<(), std::fmt::Error> {
        write!(fmt, "{self:?}")
    }
}

impl Error {
    fn status_and_detail(&self) -> (StatusCode, &'static str) {
        match &self.0.error_kind {
            DomainErrorKind::Auth(auth_error_kind) => match auth_error_kind {
                AuthErrorKind::InvalidToken => (
                    StatusCode::UNAUTHORIZED,
                    "Invalid authentication credentials",
                ),
                AuthErrorKind::UnknownUser => (StatusCode::UNAUTHORIZED, "User not found"),
                AuthErrorKind::InvalidCredentials => {
                    (StatusCode::UNAUTHORIZED, "Invalid email or password")
                }
                AuthErrorKind::InvalidPassword => (StatusCode::UNAUTHORIZED, "Invalid password"),
            },
            DomainErrorKind::Validation(validation_error_kind) => match validation_error_kind {
                ValidationErrorKind::EmailTaken => {
                    (StatusCode::BAD_REQUEST, "Email already registered")
                }
                ValidationErrorKind::UsernameTaken => {
                    (StatusCode::BAD_REQUEST, "Username already taken")
                }
                ValidationErrorKind::InvalidEmail => {
                    (StatusCode::UNPROCESSABLE_ENTITY, "Invalid email address")
                }
                ValidationErrorKind::ConfirmationMismatch => (
                    StatusCode::BAD_REQUEST,
                    "Confirmation text must be 'DELETE'",
                ),
                ValidationErrorKind::UserNotFound => (StatusCode::NOT_FOUND, "User not found"),
            },
            DomainErrorKind::Internal(internal_error_kind) => match internal_error_kind {
                InternalErrorKind::Entity(entity_error_kind) => match entity_error_kind {
                    EntityErrorKind::NotFound => (StatusCode::NOT_FOUND, "Not found"),
                    EntityErrorKind::Invalid => {
                        (StatusCode::UNPROCESSABLE_ENTITY, "Unprocessable entity")
                    }
                    EntityErrorKind::Unauthenticated => (
                        StatusCode::UNAUTHORIZED,
                        "Invalid authentication credentials",
                    ),
                    EntityErrorKind::Conflict => (StatusCode::CONFLICT, "Conflict"),
                    EntityErrorKind::DbTransaction | EntityErrorKind::Other(_) => {
                        (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
                    }
                },
                InternalErrorKind::Config | InternalErrorKind::Other(_) => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
                }
            },
            DomainErrorKind::External(external_error_kind) => match external_error_kind {
                ExternalErrorKind::Network => (StatusCode::BAD_GATEWAY, "Bad gateway"),
                ExternalErrorKind::Other(_) => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
                }
            },
        }
    }
}

// List of possible StatusCode variants https://docs.rs/http/latest/http/status/struct.StatusCode.html#associatedconstant.UNPROCESSABLE_ENTITY
impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, detail) = self.status_and_detail();
        if status.is_server_error() {
            error!("Request failed: {:?}", self.0);
        } else {
            debug!("Request refused with {status}: {:?}", self.0.error_kind);
        }

        (status, Json(json!({ "detail": detail }))).into_response()
    }
}

impl<E> From<E> for Error
where
    E: Into<DomainError>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn web_error(error_kind: DomainErrorKind) -> Error {
        Error(DomainError {
            source: None,
            error_kind,
        })
    }

    #[test]
    fn auth_failures_are_unauthorized() {
        let error = web_error(DomainErrorKind::Auth(AuthErrorKind::InvalidToken));

        assert_eq!(
            error.status_and_detail(),
            (
                StatusCode::UNAUTHORIZED,
                "Invalid authentication credentials"
            )
        );
    }

    #[test]
    fn a_missing_user_is_not_found() {
        let error = web_error(DomainErrorKind::Validation(
            ValidationErrorKind::UserNotFound,
        ));

        assert_eq!(
            error.status_and_detail(),
            (StatusCode::NOT_FOUND, "User not found")
        );
    }

    #[test]
    fn database_failures_hide_their_cause() {
        let error = web_error(DomainErrorKind::Internal(InternalErrorKind::Entity(
            EntityErrorKind::DbTransaction,
        )));

        assert_eq!(error.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}

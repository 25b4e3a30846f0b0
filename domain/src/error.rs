//! Error types for the `domain` layer.
use entity_api::error::{EntityApiErrorKind, Error as EntityApiError};
use realtime::delivery::DeliveryError;
use std::error::Error as StdError;
use std::fmt;

/// Top-level domain error type.
/// Errors in the Domain layer are modeled as a tree structure
/// with `domain::error::Error` as the root type holding a tree of `error_kind`
/// enums that represent the kinds of errors that can occur in the domain layer or
/// in lower layers. The `source` field is used to hold the original error that caused
/// the domain error. The intent is to translate errors between layers while maintaining
/// layer boundaries. Ex. `domain` is dependent on `entity_api`, and `web` is dependent on `domain`.
/// but `web` should not be dependent, directly, on `entity_api`. Each layer is free to define its own
/// error kinds to whatever richeness needed at that layer. Ultimately the various `error_kind`s are used
/// by `web` to return appropriate HTTP status codes and messages to the client.
#[derive(Debug)]
pub struct Error {
    pub source: Option<Box<dyn StdError + Send + Sync>>,
    pub error_kind: DomainErrorKind,
}

/// Enum representing the major categories of errors that can occur in the `domain` layer.
#[derive(Debug, PartialEq)]
pub enum DomainErrorKind {
    Internal(InternalErrorKind),
    External(ExternalErrorKind),
    /// The caller could not be authenticated
    Auth(AuthErrorKind),
    /// The request breaks a business rule
    Validation(ValidationErrorKind),
}

/// Enum representing the various kinds of internal errors that can occur in the `domain` layer.
#[derive(Debug, PartialEq)]
pub enum InternalErrorKind {
    Entity(EntityErrorKind),
    Config,
    Other(String),
}

/// Enum representing the various kinds of entity errors that can bubble up from the "Entity" layer (`entity_api` and `entity`).
/// These errors are translated from the `entity_api` layer to the `domain` layer and reduced to a subset of error kinds
/// that are relevant to the `domain` layer.
#[derive(Debug, PartialEq)]
pub enum EntityErrorKind {
    NotFound,
    Invalid,
    Unauthenticated,
    Conflict,
    DbTransaction,
    Other(String),
}

/// Enum representing the various kinds of external errors that can occur in the `domain` layer.
#[derive(Debug, PartialEq)]
pub enum ExternalErrorKind {
    Network,
    Other(String),
}

#[derive(Debug, PartialEq)]
pub enum AuthErrorKind {
    /// Login with an unknown email or a wrong password
    InvalidCredentials,
    /// Bearer token missing, malformed, expired or badly signed
    InvalidToken,
    /// Bearer token is valid but its user no longer exists
    UnknownUser,
    /// Password re-confirmation failed
    InvalidPassword,
}

#[derive(Debug, PartialEq)]
pub enum ValidationErrorKind {
    EmailTaken,
    UsernameTaken,
    InvalidEmail,
    /// Account deletion was not confirmed with the expected text
    ConfirmationMismatch,
    /// A referenced user does not exist
    UserNotFound,
}

impl Error {
    pub(crate) fn auth(kind: AuthErrorKind) -> Self {
        Error {
            source: None,
            error_kind: DomainErrorKind::Auth(kind),
        }
    }

    pub(crate) fn validation(kind: ValidationErrorKind) -> Self {
        Error {
            source: None,
            error_kind: DomainErrorKind::Validation(kind),
        }
    }

    /// True when the underlying entity lookup found nothing.
    pub(crate) fn is_not_found(&self) -> bool {
        self.error_kind
            == DomainErrorKind::Internal(InternalErrorKind::Entity(EntityErrorKind::NotFound))
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Domain Error: {self:?}")
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn StdError + 'static))
    }
}

// This is where we translate errors from the `entity_api`` layer to the `domain`` layer.
impl From<EntityApiError> for Error {
    fn from(err: EntityApiError) -> Self {
        let entity_error_kind = match err.error_kind {
            EntityApiErrorKind::RecordNotFound => EntityErrorKind::NotFound,
            EntityApiErrorKind::InvalidQueryTerm => EntityErrorKind::Invalid,
            EntityApiErrorKind::RecordUnauthenticated => EntityErrorKind::Unauthenticated,
            EntityApiErrorKind::Conflict => EntityErrorKind::Conflict,
            EntityApiErrorKind::SystemError => EntityErrorKind::DbTransaction,
            _ => EntityErrorKind::Other("EntityErrorKind".to_string()),
        };

        Error {
            source: Some(Box::new(err)),
            error_kind: DomainErrorKind::Internal(InternalErrorKind::Entity(entity_error_kind)),
        }
    }
}

impl From<jsonwebtoken::errors::Error> for Error {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        Error {
            source: Some(Box::new(err)),
            error_kind: DomainErrorKind::Internal(InternalErrorKind::Other(
                "JWT encoding related error".to_string(),
            )),
        }
    }
}

impl From<DeliveryError> for Error {
    fn from(err: DeliveryError) -> Self {
        Error {
            source: Some(Box::new(err)),
            error_kind: DomainErrorKind::Internal(InternalErrorKind::Entity(
                EntityErrorKind::DbTransaction,
            )),
        }
    }
}

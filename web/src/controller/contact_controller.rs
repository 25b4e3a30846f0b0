use crate::extractors::authenticated_user::AuthenticatedUser;
use crate::params::contact::AddContactParams;
use crate::{AppState, Error};
use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use domain::contact::{self as ContactApi, AddOutcome};
use domain::users;
use serde_json::json;

/// CREATE a contact. Adding an existing contact again succeeds.
#[utoipa::path(
    post,
    path = "/api/contacts",
    request_body = AddContactParams,
    responses(
        (status = 200, description = "Contact added or already present"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "User not found"),
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create(
    AuthenticatedUser(user): AuthenticatedUser,
    State(app_state): State<AppState>,
    Json(params): Json<AddContactParams>,
) -> Result<impl IntoResponse, Error> {
    let message = match ContactApi::add(app_state.db_conn_ref(), user.id, params.contact_id).await? {
        AddOutcome::Added => "Contact added successfully",
        AddOutcome::AlreadyExists => "Contact already exists",
    };

    Ok(Json(json!({ "message": message })))
}

/// GET the caller's contacts
#[utoipa::path(
    get,
    path = "/api/contacts",
    responses(
        (status = 200, description = "Users on the caller's contact list", body = [users::Model]),
        (status = 401, description = "Unauthorized"),
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn index(
    AuthenticatedUser(user): AuthenticatedUser,
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, Error> {
    let contacts = ContactApi::list(app_state.db_conn_ref(), user.id).await?;

    Ok(Json(contacts))
}

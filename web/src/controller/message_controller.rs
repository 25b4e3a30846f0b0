use crate::extractors::authenticated_user::AuthenticatedUser;
use crate::params::message::SendMessageParams;
use crate::{AppState, Error};
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use domain::{message as MessageApi, messages};
use log::*;

/// CREATE a message, store it and push it to the receiver's live connections
#[utoipa::path(
    post,
    path = "/api/messages",
    request_body = SendMessageParams,
    responses(
        (status = 200, description = "Message stored", body = messages::Model),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Receiver not found"),
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create(
    AuthenticatedUser(user): AuthenticatedUser,
    State(app_state): State<AppState>,
    Json(params): Json<SendMessageParams>,
) -> Result<impl IntoResponse, Error> {
    let (receiver_id, payload) = params.into_parts();
    debug!("CREATE message from {} to {receiver_id}", user.id);

    let message = MessageApi::send(
        app_state.db_conn_ref(),
        &app_state.hub,
        user.id,
        receiver_id,
        payload,
    )
    .await?;

    Ok(Json(message))
}

/// GET the conversation between the caller and another user, oldest first
#[utoipa::path(
    get,
    path = "/api/messages/{other_user_id}",
    params(
        ("other_user_id" = Uuid, Path, description = "The other participant of the conversation")
    ),
    responses(
        (status = 200, description = "Messages in both directions", body = [messages::Model]),
        (status = 401, description = "Unauthorized"),
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn index(
    AuthenticatedUser(user): AuthenticatedUser,
    State(app_state): State<AppState>,
    Path(other_user_id): Path<String>,
) -> Result<impl IntoResponse, Error> {
    let other_user_id = domain::parse_id(&other_user_id)?;

    let messages = MessageApi::conversation(
        app_state.db_conn_ref(),
        user.id,
        other_user_id,
        app_state.config.history_limit,
    )
    .await?;

    Ok(Json(messages))
}

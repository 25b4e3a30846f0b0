use crate::extractors::authenticated_user::AuthenticatedUser;
use crate::params::user::{DeleteAccountParams, SearchParams};
use crate::{AppState, Error};
use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use domain::{account, user as UserApi, users};
use log::*;
use serde_json::json;

/// GET users whose username or email contains the query
#[utoipa::path(
    get,
    path = "/api/users/search",
    params(SearchParams),
    responses(
        (status = 200, description = "Matching users, never including the caller", body = [users::Model]),
        (status = 401, description = "Unauthorized"),
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn search(
    AuthenticatedUser(user): AuthenticatedUser,
    State(app_state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<impl IntoResponse, Error> {
    debug!("SEARCH users for {}", user.id);

    let users = UserApi::search(
        app_state.db_conn_ref(),
        &params.q,
        user.id,
        app_state.config.search_result_limit,
    )
    .await?;

    Ok(Json(users))
}

/// GET a User by id
#[utoipa::path(
    get,
    path = "/api/users/{id}",
    params(
        ("id" = Uuid, Path, description = "User id to retrieve")
    ),
    responses(
        (status = 200, description = "Successfully retrieved a User", body = users::Model),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "User not found"),
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn read(
    AuthenticatedUser(_user): AuthenticatedUser,
    State(app_state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, Error> {
    let id = domain::parse_id(&id)?;
    let user = UserApi::find_by_id(app_state.db_conn_ref(), id).await?;

    Ok(Json(user))
}

/// DELETE the caller's account and everything that belongs to it
#[utoipa::path(
    delete,
    path = "/api/users/me",
    request_body = DeleteAccountParams,
    responses(
        (status = 200, description = "Account deleted"),
        (status = 400, description = "Confirmation text must be 'DELETE'"),
        (status = 401, description = "Invalid password"),
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete_me(
    AuthenticatedUser(user): AuthenticatedUser,
    State(app_state): State<AppState>,
    Json(params): Json<DeleteAccountParams>,
) -> Result<impl IntoResponse, Error> {
    info!("DELETE account requested by user {}", user.id);

    account::delete(
        app_state.db_conn_ref(),
        &app_state.event_publisher,
        &user,
        &params.password,
        &params.confirmation_text,
    )
    .await?;

    Ok(Json(json!({
        "message": "Account successfully deleted",
        "deleted_user_id": user.id,
        "timestamp": Utc::now(),
    })))
}

use crate::params::auth::{LoginParams, RegisterParams};
use crate::{AppState, Error};
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use domain::jwt::Jwt;
use domain::{user as UserApi, users};
use log::*;
use serde_json::json;

fn token_response(jwt: Jwt, user: users::Model) -> serde_json::Value {
    json!({
        "access_token": jwt.token,
        "token_type": "bearer",
        "user": user,
    })
}

/// CREATE a new account and return an access token for it
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterParams,
    responses(
        (status = 200, description = "Account created, returns an access token and the new user"),
        (status = 400, description = "Email already registered or username already taken"),
        (status = 422, description = "Malformed email address"),
    )
)]
pub async fn register(
    State(app_state): State<AppState>,
    Json(params): Json<RegisterParams>,
) -> Result<impl IntoResponse, Error> {
    debug!("REGISTER new user {}", params.username);

    let (jwt, user) = UserApi::register(
        app_state.db_conn_ref(),
        app_state.hub.verifier(),
        params.into(),
    )
    .await?;

    Ok((StatusCode::OK, Json(token_response(jwt, user))))
}

/// Exchange email and password for an access token
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginParams,
    responses(
        (status = 200, description = "Returns an access token and the user"),
        (status = 401, description = "Invalid email or password"),
    )
)]
pub async fn login(
    State(app_state): State<AppState>,
    Json(params): Json<LoginParams>,
) -> Result<impl IntoResponse, Error> {
    let (jwt, user) = UserApi::login(
        app_state.db_conn_ref(),
        app_state.hub.verifier(),
        &params.email,
        &params.password,
    )
    .await?;

    info!("User {} logged in", user.id);

    Ok(Json(token_response(jwt, user)))
}

use crate::extractors::authenticated_user::AuthenticatedUser;
use crate::params::audit_log::CreateAuditLogParams;
use crate::{AppState, Error};
use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use domain::{audit_log as AuditLogApi, audit_logs};
use log::*;

/// CREATE an audit log entry for the caller
#[utoipa::path(
    post,
    path = "/api/audit-logs",
    request_body = CreateAuditLogParams,
    responses(
        (status = 200, description = "Audit log entry stored", body = audit_logs::Model),
        (status = 401, description = "Unauthorized"),
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create(
    AuthenticatedUser(user): AuthenticatedUser,
    State(app_state): State<AppState>,
    Json(params): Json<CreateAuditLogParams>,
) -> Result<impl IntoResponse, Error> {
    debug!("CREATE audit log {} for user {}", params.event_type, user.id);

    let audit_log = AuditLogApi::create(app_state.db_conn_ref(), user.id, params.into()).await?;

    Ok(Json(audit_log))
}

/// GET the caller's audit log, newest first
#[utoipa::path(
    get,
    path = "/api/audit-logs",
    responses(
        (status = 200, description = "Recent audit log entries", body = [audit_logs::Model]),
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
    let audit_logs = AuditLogApi::find_by_user(
        app_state.db_conn_ref(),
        user.id,
        app_state.config.audit_log_limit,
    )
    .await?;

    Ok(Json(audit_logs))
}

use crate::controller::{
    audit_log_controller, auth_controller, contact_controller, health_check_controller,
    message_controller, user_controller,
};
use crate::{params, ws, AppState};
use axum::{
    routing::{delete, get, post},
    Router,
};

use utoipa::{
    openapi::security::{Http, HttpAuthScheme, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_rapidoc::RapiDoc;

// This is the global definition of our OpenAPI spec. To be a part
// of the rendered spec, a path and schema must be listed here.
#[derive(OpenApi)]
#[openapi(
        info(
            title = "SecureChat API"
        ),
        paths(
            health_check_controller::health_check,
            health_check_controller::api_root,
            auth_controller::register,
            auth_controller::login,
            user_controller::search,
            user_controller::read,
            user_controller::delete_me,
            message_controller::create,
            message_controller::index,
            contact_controller::create,
            contact_controller::index,
            audit_log_controller::create,
            audit_log_controller::index,
        ),
        components(
            schemas(
                domain::users::Model,
                domain::messages::Model,
                domain::audit_logs::Model,
                params::auth::RegisterParams,
                params::auth::LoginParams,
                params::user::DeleteAccountParams,
                params::message::SendMessageParams,
                params::contact::AddContactParams,
                params::audit_log::CreateAuditLogParams,
            )
        ),
        modifiers(&SecurityAddon),
        tags(
            (name = "securechat", description = "SecureChat end-to-end encrypted messaging relay")
        )
    )]
struct ApiDoc;

struct SecurityAddon;

// Defines the bearer token authentication requirement for gaining access to our
// API endpoints for OpenAPI.
impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
            )
        }
    }
}

pub fn define_routes(app_state: AppState) -> Router {
    Router::new()
        .merge(health_routes())
        .merge(auth_routes(app_state.clone()))
        .merge(user_routes(app_state.clone()))
        .merge(message_routes(app_state.clone()))
        .merge(contact_routes(app_state.clone()))
        .merge(audit_log_routes(app_state.clone()))
        .merge(ws_routes(app_state))
        // FIXME: protect the OpenAPI web UI
        .merge(RapiDoc::with_openapi("/api-docs/openapi2.json", ApiDoc::openapi()).path("/rapidoc"))
}

fn health_routes() -> Router {
    Router::new()
        .route("/health", get(health_check_controller::health_check))
        .route("/api/", get(health_check_controller::api_root))
}

fn auth_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/api/auth/register", post(auth_controller::register))
        .route("/api/auth/login", post(auth_controller::login))
        .with_state(app_state)
}

fn user_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/api/users/search", get(user_controller::search))
        .route("/api/users/me", delete(user_controller::delete_me))
        .route("/api/users/:id", get(user_controller::read))
        .with_state(app_state)
}

fn message_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/api/messages", post(message_controller::create))
        .route("/api/messages/:other_user_id", get(message_controller::index))
        .with_state(app_state)
}

fn contact_routes(app_state: AppState) -> Router {
    Router::new()
        .route(
            "/api/contacts",
            post(contact_controller::create).get(contact_controller::index),
        )
        .with_state(app_state)
}

fn audit_log_routes(app_state: AppState) -> Router {
    Router::new()
        .route(
            "/api/audit-logs",
            post(audit_log_controller::create).get(audit_log_controller::index),
        )
        .with_state(app_state)
}

fn ws_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/ws", get(ws::handler::ws_handler))
        .with_state(app_state)
}

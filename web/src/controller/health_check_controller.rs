use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

/// GET liveness of the API router
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "API router is up and responding to requests", body = String),
        (status = 500, description = "Internal Server Error")
    )
)]
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "healthy")
}

/// GET the API banner
#[utoipa::path(
    get,
    path = "/api/",
    responses(
        (status = 200, description = "Name, version and status of the API"),
    )
)]
pub async fn api_root() -> impl IntoResponse {
    Json(json!({
        "message": "SecureChat API",
        "version": "1.0.0",
        "status": "operational",
    }))
}

//! HTTP and WebSocket surface of SecureChat.

use axum::http::{
    header::{AUTHORIZATION, CONTENT_TYPE},
    HeaderValue, Method,
};
use log::*;
use tower_http::cors::{AllowOrigin, CorsLayer};

pub use error::{Error, Result};
pub use service::AppState;

mod controller;
mod error;
mod extractors;
mod params;
mod router;
mod ws;

/// Bind the configured interface and port and serve the API until the process exits.
pub async fn init_server(app_state: AppState) -> std::io::Result<()> {
    let interface = app_state
        .config
        .interface
        .clone()
        .unwrap_or_else(|| "127.0.0.1".to_string());
    let server_url = format!("{interface}:{}", app_state.config.port);

    info!("CORS allowed origins: {:?}", app_state.config.allowed_origins);
    let cors_layer = CorsLayer::new()
        .allow_methods([Method::DELETE, Method::GET, Method::OPTIONS, Method::POST])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE])
        .allow_origin(allow_origin(&app_state.config.allowed_origins));

    let listen_addr = tokio::net::TcpListener::bind(&server_url).await?;
    info!("Server starting... listening for connections on http://{server_url}");

    axum::serve(listen_addr, router::define_routes(app_state).layer(cors_layer)).await
}

fn allow_origin(origins: &[String]) -> AllowOrigin {
    if origins.iter().any(|origin| origin == "*") {
        return AllowOrigin::any();
    }

    AllowOrigin::list(origins.iter().filter_map(|origin| {
        origin
            .parse::<HeaderValue>()
            .inspect_err(|e| warn!("Ignoring invalid CORS origin {origin}: {e}"))
            .ok()
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header::ORIGIN, Request};
    use axum::{routing::get, Router};
    use tower::ServiceExt;

    async fn allowed_origin_header(origins: &[&str], origin: &str) -> Option<HeaderValue> {
        let origins: Vec<String> = origins.iter().map(|o| o.to_string()).collect();
        let app = Router::new()
            .route("/", get(|| async { "ok" }))
            .layer(CorsLayer::new().allow_origin(allow_origin(&origins)));

        let response = app
            .oneshot(
                Request::get("/")
                    .header(ORIGIN, origin)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        response
            .headers()
            .get("access-control-allow-origin")
            .cloned()
    }

    #[tokio::test]
    async fn listed_origins_are_allowed() {
        let header = allowed_origin_header(&["http://localhost:3000"], "http://localhost:3000").await;

        assert_eq!(header, Some(HeaderValue::from_static("http://localhost:3000")));
    }

    #[tokio::test]
    async fn unlisted_origins_get_no_cors_header() {
        let header = allowed_origin_header(&["http://localhost:3000"], "http://evil.example").await;

        assert_eq!(header, None);
    }

    #[tokio::test]
    async fn a_wildcard_allows_any_origin() {
        let header = allowed_origin_header(&["*"], "http://anywhere.example").await;

        assert_eq!(header, Some(HeaderValue::from_static("*")));
    }
}

//! SecureChat relay server.
//!
//! Serves the HTTP API and the `/ws` real-time endpoint from one process.

use domain::message::DbMessageStore;
use domain::{EventPublisher, IdentityVerifier};
use log::*;
use migration::{Migrator, MigratorTrait};
use realtime::Hub;
use service::{config::Config, logging::Logger, AppState};
use std::sync::Arc;
use std::time::Duration;

#[tokio::main]
async fn main() {
    let config = Config::new();
    Logger::init_logger(&config as &Config);

    info!("Starting SecureChat relay in {} mode", config.runtime_env());

    if config.uses_default_jwt_secret() {
        if config.is_production() {
            error!("JWT_SECRET_KEY is unset, access tokens are signed with the publicly known default secret");
        } else {
            warn!("Using the default JWT secret key, set JWT_SECRET_KEY before deploying");
        }
    }

    let db = match service::init_database(&config).await {
        Ok(db) => Arc::new(db),
        Err(e) => {
            error!("Failed to establish database connection: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = Migrator::up(db.as_ref(), None).await {
        error!("Failed to apply database migrations: {e}");
        std::process::exit(1);
    }

    let verifier = IdentityVerifier::new(config.jwt_secret_key(), config.jwt_expiry_seconds);
    let hub = Arc::new(Hub::new(
        verifier,
        Arc::new(DbMessageStore::new(&db)),
        Duration::from_secs(config.handshake_timeout_secs),
    ));
    let event_publisher = EventPublisher::new().with_handler(Arc::new(hub.event_handler()));

    let app_state = AppState::new(config, &db, hub, event_publisher);

    if let Err(e) = web::init_server(app_state).await {
        error!("Server stopped: {e}");
        std::process::exit(1);
    }
}

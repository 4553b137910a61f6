//! # Parceltrack API Server
//!
//! REST transport for the account-management and package-tracking service.
//!
//! ## Architecture
//!
//! The server wires the Postgres-backed stores and the carrier HTTP client
//! into the account service core, then exposes it over Axum:
//! registration, login, account updates, package registration and
//! anonymous tracking lookups.
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p parceltrack-api
//! ```

use parceltrack_api::{
    app::{build_router, AppState},
    config::Config,
};
use parceltrack_shared::{
    db::{migrations, pool},
    service::AccountService,
    store::postgres::{PgTrackerStore, PgUserStore},
    tracking::carrier::CarrierClient,
};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "parceltrack_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        "Parceltrack API Server v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let config = Config::from_env()?;

    // Database pool + schema
    let db = pool::create_pool(pool::DatabaseConfig {
        url: config.database.url.clone(),
        max_connections: config.database.max_connections,
        ..Default::default()
    })
    .await?;
    migrations::run_migrations(&db).await?;

    // Collaborators behind the service seams
    let users = Arc::new(PgUserStore::new(db.clone()));
    let trackers = Arc::new(PgTrackerStore::new(db));
    let provider = Arc::new(CarrierClient::new(
        config.carrier.base_url.clone(),
        Duration::from_secs(config.carrier.timeout_seconds),
    )?);

    let service = Arc::new(AccountService::new(
        users,
        trackers,
        provider,
        config.jwt.secret.clone(),
    ));

    let bind_address = config.bind_address();
    let state = AppState::new(service, config);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    tracing::info!("Server listening on http://{}", bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", err);
        return;
    }
    tracing::info!("Shutdown signal received, draining connections...");
}

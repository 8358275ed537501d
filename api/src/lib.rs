//! Adsight API Server
//!
//! This crate provides the HTTP server for the Adsight marketing analytics
//! platform. It serves the dashboard aggregate endpoints backed by the
//! rollup engine in the `shared` crate.
//!
//! # Architecture
//!
//! The API server is built on Axum and Tokio, providing:
//! - REST endpoints for overview, trend, channel, and breakdown aggregates
//! - A health check endpoint for load balancers
//! - An event store abstraction with in-memory and `ClickHouse` backends
//!
//! # Example
//!
//! ```no_run
//! use api::run_server;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     run_server().await
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod config;
pub mod db;
mod routes;
mod state;

pub use config::Config;
pub use state::AppState;

use anyhow::Result;
use axum::Router;
use shared::storage::ClickHouseEventStore;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

/// Runs the Adsight API server.
///
/// This function initializes the server with configuration from environment
/// variables and starts listening for incoming connections. It handles
/// graceful shutdown on SIGTERM/SIGINT signals.
///
/// # Errors
///
/// Returns an error if:
/// - Configuration cannot be loaded from environment
/// - The server fails to bind to the configured address
/// - A fatal error occurs during operation
pub async fn run_server() -> Result<()> {
    let config = Config::from_env()?;
    run_server_with_config(config).await
}

/// Runs the Adsight API server with the provided configuration.
///
/// This is useful for testing or when you want to provide configuration programmatically.
///
/// # Errors
///
/// Returns an error if:
/// - The server fails to bind to the configured address
/// - A fatal error occurs during operation
pub async fn run_server_with_config(config: Config) -> Result<()> {
    let addr = config.socket_addr();

    tracing::info!(
        host = %config.host,
        port = %config.port,
        timezone = %config.engine.timezone,
        "Adsight API server starting"
    );

    let state = build_state(&config).await?;
    let app = create_router(state);
    let listener = TcpListener::bind(addr).await?;

    tracing::info!(%addr, "Listening for connections");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Builds the application state: a `ClickHouse`-backed event store when
/// `ADSIGHT_DB_URL` is configured, an in-memory store otherwise.
async fn build_state(config: &Config) -> Result<AppState> {
    if std::env::var("ADSIGHT_DB_URL").is_ok() {
        let db_config = db::DatabaseConfig::from_env()?;
        let database = db::Database::new(&db_config);
        database.ping().await?;

        tracing::info!(url = %db_config.url, "Using ClickHouse event store");
        let store = ClickHouseEventStore::new_shared(database.client());
        Ok(AppState::new(store, config.engine.clone()))
    } else {
        tracing::warn!("ADSIGHT_DB_URL not set, using in-memory event store");
        Ok(AppState::new(
            Arc::new(shared::storage::InMemoryEventStore::new()),
            config.engine.clone(),
        ))
    }
}

/// Creates the main application router with all routes and middleware.
///
/// This function is public to allow testing the router without starting a full server.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(routes::health_routes())
        .merge(routes::dashboard_routes(state))
        .layer(TraceLayer::new_for_http())
}

/// Waits for a shutdown signal (SIGTERM or SIGINT).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}

//! gatehouse HTTP server.
//!
//! Serves access decisions and capability sets over HTTP. Federated callers
//! authenticate with HTTP signatures; policy and seed data are loaded from
//! JSON files named in [`ServerConfig`](config::ServerConfig).

pub mod config;
pub mod error;
pub mod loader;
pub mod middleware;
pub mod routes;
pub mod state;

use crate::config::ServerConfig;
use crate::error::StartupError;
use crate::loader::{Stores, load_policy, load_seed};
use crate::state::AppState;
use axum::Router;
use axum::routing::{get, post};
use rootcause::prelude::Report;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// Builds the application router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(routes::health))
        .route("/permissions", get(routes::permissions))
        .route("/decide", post(routes::decide))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Loads data, binds the listener and serves until Ctrl-C.
///
/// # Errors
///
/// Returns an error if the policy or seed data cannot be loaded, or the
/// listener cannot be bound.
pub async fn run(config: ServerConfig) -> Result<(), Report<StartupError>> {
    let policy = load_policy(&config.policy_path)?;
    let stores = match &config.seed_path {
        Some(path) => load_seed(path)?,
        None => {
            warn!("no seed file configured, starting with empty stores");
            Stores::default()
        }
    };

    let state = Arc::new(AppState::new(policy, stores, config.signature));
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .map_err(|e| StartupError::Serve {
            details: format!("failed to bind to '{}': {}", config.bind_addr, e),
        })?;

    info!("listening on http://{}", config.bind_addr);

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| StartupError::Serve {
            details: e.to_string(),
        })?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}

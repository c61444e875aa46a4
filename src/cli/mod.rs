//! CLI module for the Typesim server functionality.
//!
//! This module provides the `typesim serve` command implementation.

mod config;
mod handlers;
mod state;
mod types;

pub use config::{Config, ConfigError, ServerConfig, SimulationConfig, TypingSection};
pub use state::AppState;
pub use types::*;

use crate::stats::{new_shared_stats, SharedStats};
use axum::{
    routing::{get, post},
    Router,
};
use std::{net::SocketAddr, sync::Arc};
use tokio::signal;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Build the HTTP router over shared state
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/typesim/stats", get(handlers::get_stats))
        .route("/v1/estimate", post(handlers::estimate))
        .route("/v1/events", post(handlers::events))
        .route("/v1/preview", post(handlers::preview))
        .route(
            "/v1/sessions/{key}",
            get(handlers::get_session).delete(handlers::cancel_session),
        )
        .route("/v1/sessions/{key}/simulate", post(handlers::simulate))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

/// Run the Typesim server with the given configuration
pub async fn run_server(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    run_server_with_stats(config, new_shared_stats()).await
}

/// Run the Typesim server with the given configuration and shared stats
pub async fn run_server_with_stats(
    config: Config,
    stats: SharedStats,
) -> Result<(), Box<dyn std::error::Error>> {
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;

    tracing::info!("Starting Typesim server on {}", addr);
    tracing::info!(
        "Configuration: profile={}, seed={:?}, hour={:?}, time_scale={}",
        config.typing.profile.as_deref().unwrap_or("average"),
        config.simulation.seed,
        config.simulation.hour,
        config.simulation.time_scale
    );
    tracing::info!("Stats endpoint: /typesim/stats");

    let state = Arc::new(AppState::new(config, stats)?);
    let driver = state.driver.clone();
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    let cancelled = driver.cancel_all();
    tracing::info!(cancelled, "Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}

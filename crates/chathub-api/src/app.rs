//! Application builder: wires router, middleware and state into an Axum app,
//! and runs the server.

use std::future::IntoFuture;
use std::time::Duration;

use axum::Router;
use tokio::sync::oneshot;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use chathub_core::config::AppConfig;
use chathub_core::error::AppError;

use crate::middleware::cors::build_cors_layer;
use crate::router::build_router;
use crate::state::AppState;

/// Builds the complete Axum application with all routes and middleware.
pub fn build_app(state: AppState) -> Router {
    let cors = build_cors_layer(&state.config.server);
    build_router(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Runs the ChatHub server until a shutdown signal arrives.
pub async fn run_server(config: AppConfig) -> Result<(), AppError> {
    let addr = config.server.bind_address();
    let grace = Duration::from_secs(config.server.shutdown_grace_seconds);

    let state = AppState::new(config);
    let hub = state.hub.clone();
    let sweeper = hub.spawn_dedup_sweeper();

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    info!(addr = %addr, "ChatHub server listening");

    let (signalled_tx, signalled_rx) = oneshot::channel();
    let shutdown_hub = hub.clone();
    let server = axum::serve(listener, build_app(state))
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            shutdown_hub.shutdown().await;
            let _ = signalled_tx.send(());
        })
        .into_future();
    tokio::pin!(server);

    let result = tokio::select! {
        result = &mut server => {
            hub.shutdown().await;
            result
        }
        Ok(()) = signalled_rx => {
            match tokio::time::timeout(grace, &mut server).await {
                Ok(result) => result,
                Err(_) => {
                    warn!(grace_seconds = grace.as_secs(), "Graceful shutdown timed out");
                    Ok(())
                }
            }
        }
    };

    if let Err(e) = sweeper.await {
        error!(error = %e, "Dedup sweeper task failed");
    }

    result.map_err(|e| AppError::internal(format!("Server error: {e}")))?;
    info!("ChatHub server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

//! Route definitions for the ChatHub HTTP API.
//!
//! The router receives `AppState` and passes it to all handlers via Axum's
//! `State` extractor.

use axum::{
    Router, middleware as axum_middleware,
    routing::{delete, get, post, put},
};

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Build the router with all routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/ws", get(handlers::ws::ws_upgrade))
        .nest("/api", health_routes())
        .nest("/internal", internal_routes(&state))
        .with_state(state)
}

/// Liveness probe
fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}

/// Service-to-service routes: dispatch, membership sync, stats
fn internal_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/dispatch", post(handlers::dispatch::dispatch))
        .route("/stats", get(handlers::stats::stats))
        .route("/chats/{chat_id}", delete(handlers::membership::remove_chat))
        .route(
            "/chats/{chat_id}/members",
            put(handlers::membership::replace_members),
        )
        .route(
            "/chats/{chat_id}/members/{user_id}",
            post(handlers::membership::add_member).delete(handlers::membership::remove_member),
        )
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::internal::require_internal_key,
        ))
}

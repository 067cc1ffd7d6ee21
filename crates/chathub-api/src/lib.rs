//! # chathub-api
//!
//! HTTP boundary for ChatHub built on Axum.
//!
//! Provides the authenticated WebSocket upgrade that feeds connections into
//! the real-time hub, the internal routes backend services use to dispatch
//! events and keep the chat membership cache current, and error mapping.

pub mod app;
pub mod auth;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::build_app;
pub use state::AppState;

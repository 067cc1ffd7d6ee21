//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use chathub_core::config::AppConfig;
use chathub_realtime::{Hub, MembershipCache};

use crate::auth::JwtDecoder;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are cheap to clone across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Real-time fanout hub
    pub hub: Hub,
    /// Chat membership cache the hub resolves chats through
    pub membership: Arc<MembershipCache>,
    /// Access token validation
    pub jwt_decoder: Arc<JwtDecoder>,
}

impl AppState {
    /// Builds the state: a membership cache, a hub resolving through it, and
    /// a token decoder.
    pub fn new(config: AppConfig) -> Self {
        let membership = Arc::new(MembershipCache::new());
        let hub = Hub::new(config.realtime.clone(), membership.clone());
        let jwt_decoder = Arc::new(JwtDecoder::new(&config.auth));

        Self {
            config: Arc::new(config),
            hub,
            membership,
            jwt_decoder,
        }
    }
}

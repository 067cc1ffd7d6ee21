//! CORS layer configuration.

use axum::http::{HeaderValue, Method};
use tower_http::cors::{Any, CorsLayer};

use chathub_core::config::ServerConfig;

/// Builds a CORS tower layer from configuration. No configured origins, or a
/// `*` entry, allows any origin.
pub fn build_cors_layer(config: &ServerConfig) -> CorsLayer {
    let mut layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    let origins = &config.cors_allowed_origins;
    if origins.is_empty() || origins.iter().any(|o| o == "*") {
        layer = layer.allow_origin(Any);
    } else {
        let origins: Vec<HeaderValue> = origins.iter().filter_map(|o| o.parse().ok()).collect();
        layer = layer.allow_origin(origins);
    }

    layer
}

//! Authentication configuration.

use serde::{Deserialize, Serialize};

/// Token verification settings for WebSocket upgrades and internal routes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Secret key the REST layer signs access tokens with (HMAC-SHA256).
    #[serde(default)]
    pub jwt_secret: String,
    /// Shared key required on `/internal` routes. Unset disables the check.
    #[serde(default)]
    pub internal_api_key: Option<String>,
    /// Allowed clock skew when validating `exp`, in seconds.
    #[serde(default = "default_leeway")]
    pub leeway_seconds: u64,
}

fn default_leeway() -> u64 {
    5
}

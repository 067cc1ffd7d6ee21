//! Response DTOs.

use serde::{Deserialize, Serialize};

use chathub_core::types::ChatId;
use chathub_realtime::metrics::MetricsSnapshot;

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `ok` while the process serves requests.
    pub status: String,
}

/// Hub statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsResponse {
    /// Live WebSocket connections.
    pub connections: usize,
    /// Chats in the membership cache.
    pub cached_chats: usize,
    /// Live dedup keys.
    pub dedup_keys: usize,
    /// Hub counters.
    pub metrics: MetricsSnapshot,
}

/// Result of a membership change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MembershipResponse {
    /// Chat that was changed.
    pub chat_id: ChatId,
    /// Whether the cache changed.
    pub changed: bool,
}

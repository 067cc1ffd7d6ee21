//! Hub statistics.

use axum::Json;
use axum::extract::State;

use crate::dto::response::StatsResponse;
use crate::state::AppState;

/// GET /internal/stats
pub async fn stats(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(StatsResponse {
        connections: state.hub.connection_count(),
        cached_chats: state.membership.chat_count(),
        dedup_keys: state.hub.dedup().len(),
        metrics: state.hub.metrics(),
    })
}

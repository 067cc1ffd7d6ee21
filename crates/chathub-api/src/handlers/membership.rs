//! Chat membership cache maintenance.
//!
//! The REST layer owns membership; it pushes every change here so chat
//! fanout resolves against current members.

use axum::Json;
use axum::extract::{Path, State};
use tracing::debug;
use validator::Validate;

use chathub_core::types::{ChatId, UserId};

use crate::dto::request::ReplaceMembersRequest;
use crate::dto::response::MembershipResponse;
use crate::error::ApiResult;
use crate::state::AppState;

/// PUT /internal/chats/{chat_id}/members
pub async fn replace_members(
    State(state): State<AppState>,
    Path(chat_id): Path<ChatId>,
    Json(req): Json<ReplaceMembersRequest>,
) -> ApiResult<Json<MembershipResponse>> {
    req.validate()?;

    let count = req.members.len();
    state.membership.set_members(chat_id, req.members);
    debug!(chat_id = %chat_id, members = count, "Chat members replaced");

    Ok(Json(MembershipResponse {
        chat_id,
        changed: true,
    }))
}

/// POST /internal/chats/{chat_id}/members/{user_id}
pub async fn add_member(
    State(state): State<AppState>,
    Path((chat_id, user_id)): Path<(ChatId, UserId)>,
) -> Json<MembershipResponse> {
    let changed = state.membership.add_member(chat_id, user_id);
    debug!(chat_id = %chat_id, user_id = %user_id, changed, "Chat member added");
    Json(MembershipResponse { chat_id, changed })
}

/// DELETE /internal/chats/{chat_id}/members/{user_id}
pub async fn remove_member(
    State(state): State<AppState>,
    Path((chat_id, user_id)): Path<(ChatId, UserId)>,
) -> Json<MembershipResponse> {
    let changed = state.membership.remove_member(chat_id, user_id);
    debug!(chat_id = %chat_id, user_id = %user_id, changed, "Chat member removed");
    Json(MembershipResponse { chat_id, changed })
}

/// DELETE /internal/chats/{chat_id}
pub async fn remove_chat(
    State(state): State<AppState>,
    Path(chat_id): Path<ChatId>,
) -> Json<MembershipResponse> {
    let changed = state.membership.remove_chat(chat_id).is_some();
    debug!(chat_id = %chat_id, changed, "Chat dropped from membership cache");
    Json(MembershipResponse { chat_id, changed })
}

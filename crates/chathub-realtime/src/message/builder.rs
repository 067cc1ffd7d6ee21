//! Builder helpers for constructing outbound event envelopes.
//!
//! Events with a stable identity get a dedup key here, so every call site
//! that emits the same logical event collapses onto one delivery.

use chrono::{DateTime, Utc};
use serde_json::json;

use chathub_core::types::{ChatId, UserId};

use super::envelope::Envelope;
use super::kinds;

/// Build a `new_message` event.
pub fn build_new_message(
    chat_id: ChatId,
    message_id: u64,
    sender_id: UserId,
    message: serde_json::Value,
) -> Envelope {
    Envelope::new(
        kinds::NEW_MESSAGE,
        json!({
            "chat_id": chat_id,
            "message_id": message_id,
            "sender_id": sender_id,
            "message": message,
        }),
    )
    .with_dedup_key(format!("msg:{chat_id}:{message_id}"))
}

/// Build a `message_edited` event. Each edit is a distinct event.
pub fn build_message_edited(
    chat_id: ChatId,
    message_id: u64,
    edited_at: DateTime<Utc>,
    message: serde_json::Value,
) -> Envelope {
    Envelope::new(
        kinds::MESSAGE_EDITED,
        json!({
            "chat_id": chat_id,
            "message_id": message_id,
            "edited_at": edited_at,
            "message": message,
        }),
    )
    .with_dedup_key(format!(
        "msg_edit:{chat_id}:{message_id}:{}",
        edited_at.timestamp_millis()
    ))
}

/// Build a `message_deleted` event.
pub fn build_message_deleted(chat_id: ChatId, message_id: u64) -> Envelope {
    Envelope::new(
        kinds::MESSAGE_DELETED,
        json!({ "chat_id": chat_id, "message_id": message_id }),
    )
    .with_dedup_key(format!("msg_del:{chat_id}:{message_id}"))
}

/// Build a `message_read` receipt. Redelivery is harmless, so no dedup key.
pub fn build_message_read(
    chat_id: ChatId,
    message_id: u64,
    reader_id: UserId,
    read_at: DateTime<Utc>,
) -> Envelope {
    Envelope::new(
        kinds::MESSAGE_READ,
        json!({
            "chat_id": chat_id,
            "message_id": message_id,
            "reader_id": reader_id,
            "read_at": read_at,
        }),
    )
}

/// Build a `chat_created` event for one member of the new chat.
pub fn build_chat_created(chat_id: ChatId, user_id: UserId, chat: serde_json::Value) -> Envelope {
    Envelope::new(
        kinds::CHAT_CREATED,
        json!({ "chat_id": chat_id, "user_id": user_id, "chat": chat }),
    )
    .with_dedup_key(format!("chat_created:{chat_id}:{user_id}"))
}

/// Build a `chat_invite` event.
pub fn build_chat_invite(
    chat_id: ChatId,
    user_id: UserId,
    invited_by: UserId,
    chat_name: &str,
) -> Envelope {
    Envelope::new(
        kinds::CHAT_INVITE,
        json!({
            "chat_id": chat_id,
            "user_id": user_id,
            "invited_by": invited_by,
            "chat_name": chat_name,
        }),
    )
    .with_dedup_key(format!("chat_invite:{chat_id}:{user_id}"))
}

/// Build a `chat_join_request` event.
pub fn build_chat_join_request(chat_id: ChatId, requester_id: UserId) -> Envelope {
    Envelope::new(
        kinds::CHAT_JOIN_REQUEST,
        json!({ "chat_id": chat_id, "requester_id": requester_id }),
    )
    .with_dedup_key(format!("chat_join_request:{chat_id}:{requester_id}"))
}

/// Build a `chat_deleted` event.
pub fn build_chat_deleted(chat_id: ChatId, deleted_by: UserId) -> Envelope {
    Envelope::new(
        kinds::CHAT_DELETED,
        json!({ "chat_id": chat_id, "deleted_by": deleted_by }),
    )
    .with_dedup_key(format!("chat_deleted:{chat_id}"))
}

/// Build a `member_added` event.
pub fn build_member_added(chat_id: ChatId, user_id: UserId, added_by: UserId) -> Envelope {
    Envelope::new(
        kinds::MEMBER_ADDED,
        json!({ "chat_id": chat_id, "user_id": user_id, "added_by": added_by }),
    )
}

/// Build a `member_removed` event.
pub fn build_member_removed(chat_id: ChatId, user_id: UserId) -> Envelope {
    Envelope::new(
        kinds::MEMBER_REMOVED,
        json!({ "chat_id": chat_id, "user_id": user_id }),
    )
}

/// Build a `contact_request` event; `action` is `"new"` or `"update"`.
pub fn build_contact_request(request: serde_json::Value, action: &str) -> Envelope {
    Envelope::new(
        kinds::CONTACT_REQUEST,
        json!({ "request": request, "action": action }),
    )
}

/// Build a best-effort `typing` notice.
pub fn build_typing(chat_id: ChatId, user_id: UserId) -> Envelope {
    Envelope::new(
        kinds::TYPING,
        json!({ "chat_id": chat_id, "user_id": user_id }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_message_key_is_stable() {
        let a = build_new_message(ChatId(7), 42, UserId(1), json!({ "text": "hi" }));
        let b = build_new_message(ChatId(7), 42, UserId(1), json!({ "text": "hi again" }));
        assert_eq!(a.dedup_key.as_deref(), Some("msg:7:42"));
        assert_eq!(a.dedup_key, b.dedup_key);
        assert_eq!(a.data["sender_id"], 1);
    }

    #[test]
    fn test_edits_get_distinct_keys() {
        let t1 = DateTime::from_timestamp(1_700_000_000, 0).expect("timestamp");
        let t2 = DateTime::from_timestamp(1_700_000_001, 0).expect("timestamp");
        let a = build_message_edited(ChatId(1), 2, t1, json!({}));
        let b = build_message_edited(ChatId(1), 2, t2, json!({}));
        assert_ne!(a.dedup_key, b.dedup_key);
    }

    #[test]
    fn test_receipts_and_typing_have_no_key() {
        assert!(build_message_read(ChatId(1), 2, UserId(3), Utc::now())
            .dedup_key
            .is_none());
        assert!(build_typing(ChatId(1), UserId(3)).dedup_key.is_none());
        assert_eq!(build_typing(ChatId(1), UserId(3)).kind, kinds::TYPING);
    }
}

//! Request DTOs with validation.

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use chathub_core::types::UserId;
use chathub_realtime::{Envelope, Scope};

/// Upper bound on explicit user lists and member sets in one request.
pub const MAX_USERS_PER_REQUEST: usize = 10_000;

/// Body of `POST /internal/dispatch`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct DispatchRequest {
    /// Event kind, copied into the envelope's `type`.
    #[serde(rename = "type")]
    #[validate(length(min = 1, max = 64, message = "type must be 1-64 characters"))]
    pub kind: String,
    /// Event body.
    #[serde(default)]
    pub data: serde_json::Value,
    /// Collapses repeated emissions of the same event.
    #[validate(length(min = 1, max = 256))]
    pub dedup_key: Option<String>,
    /// Who receives the event.
    #[validate(custom(function = "validate_scope"))]
    pub scope: Scope,
}

impl DispatchRequest {
    /// Splits the request into the envelope and its scope.
    pub fn into_parts(self) -> (Envelope, Scope) {
        let envelope = Envelope::new(self.kind, self.data);
        let envelope = match self.dedup_key {
            Some(key) => envelope.with_dedup_key(key),
            None => envelope,
        };
        (envelope, self.scope)
    }
}

fn validate_scope(scope: &Scope) -> Result<(), ValidationError> {
    match scope {
        Scope::ToUsers(users) if users.len() > MAX_USERS_PER_REQUEST => {
            Err(ValidationError::new("too_many_users"))
        }
        _ => Ok(()),
    }
}

/// Body of `PUT /internal/chats/{chat_id}/members`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ReplaceMembersRequest {
    /// Full member set of the chat.
    #[validate(length(max = 10000))]
    pub members: Vec<UserId>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use chathub_core::types::ChatId;

    use super::*;

    #[test]
    fn test_dispatch_request_parses_scope() {
        let request: DispatchRequest = serde_json::from_value(json!({
            "type": "new_message",
            "data": { "text": "hi" },
            "dedup_key": "msg:7:5",
            "scope": { "to_chat_except": { "chat_id": 7, "exclude": 1 } }
        }))
        .expect("parses");
        assert!(request.validate().is_ok());

        let (envelope, scope) = request.into_parts();
        assert_eq!(envelope.kind, "new_message");
        assert_eq!(envelope.dedup_key.as_deref(), Some("msg:7:5"));
        assert_eq!(scope, Scope::chat_except(ChatId(7), UserId(1)));
    }

    #[test]
    fn test_empty_kind_rejected() {
        let request = DispatchRequest {
            kind: String::new(),
            data: json!({}),
            dedup_key: None,
            scope: Scope::ToUser(UserId(1)),
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_oversized_user_list_rejected() {
        let request = DispatchRequest {
            kind: "chat_deleted".to_string(),
            data: json!({}),
            dedup_key: None,
            scope: Scope::ToUsers((0..=MAX_USERS_PER_REQUEST as u64).map(UserId).collect()),
        };
        assert!(request.validate().is_err());
    }
}

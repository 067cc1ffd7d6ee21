//! Event envelope exchanged between the hub and client connections.

use serde::{Deserialize, Serialize};

/// The typed event unit pushed to clients.
///
/// Serializes as `{ "type": "<kind>", "data": { ... } }`. The dedup key is
/// hub-side metadata and never reaches the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    /// Event kind tag, e.g. `"new_message"`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Kind-specific payload.
    #[serde(default)]
    pub data: serde_json::Value,
    /// Stable identity of the event for duplicate suppression.
    #[serde(skip)]
    pub dedup_key: Option<String>,
}

impl Envelope {
    /// Create an envelope without a dedup key.
    pub fn new(kind: impl Into<String>, data: serde_json::Value) -> Self {
        Self {
            kind: kind.into(),
            data,
            dedup_key: None,
        }
    }

    /// Attach a dedup key.
    pub fn with_dedup_key(mut self, key: impl Into<String>) -> Self {
        self.dedup_key = Some(key.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_wire_shape_omits_dedup_key() {
        let env = Envelope::new("chat_deleted", json!({ "chat_id": 7 })).with_dedup_key("k");
        let value = serde_json::to_value(&env).expect("serialize");
        assert_eq!(value, json!({ "type": "chat_deleted", "data": { "chat_id": 7 } }));
    }

    #[test]
    fn test_deserialize_without_data() {
        let env: Envelope = serde_json::from_str(r#"{"type":"ping"}"#).expect("deserialize");
        assert_eq!(env.kind, "ping");
        assert!(env.data.is_null());
        assert!(env.dedup_key.is_none());
    }
}

//! Transport frames and client-originated request types.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use chathub_core::types::ChatId;

/// A transport-neutral WebSocket frame.
///
/// The pumps speak this type; the HTTP layer maps its framework's message
/// type into and out of it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WireMessage {
    /// UTF-8 text frame.
    Text(String),
    /// Binary frame.
    Binary(Bytes),
    /// Ping control frame.
    Ping(Bytes),
    /// Pong control frame.
    Pong(Bytes),
    /// Close control frame.
    Close,
}

/// Requests sent by the client to the server.
///
/// Wire shape matches the envelope: `{ "type": ..., "data": { ... } }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum ClientRequest {
    /// The client displayed a message to its user.
    MessageRead {
        /// Chat the message belongs to.
        chat_id: ChatId,
        /// Message that was read.
        message_id: u64,
    },
    /// The client's user is typing in a chat.
    Typing {
        /// Chat being typed in.
        chat_id: ChatId,
    },
    /// Acknowledge receipt of a pushed message.
    Ack {
        /// Message being acknowledged.
        message_id: u64,
    },
    /// Application-level keepalive.
    Ping,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_message_read() {
        let req: ClientRequest =
            serde_json::from_str(r#"{"type":"message_read","data":{"chat_id":7,"message_id":42}}"#)
                .expect("decode");
        assert_eq!(
            req,
            ClientRequest::MessageRead {
                chat_id: ChatId(7),
                message_id: 42
            }
        );
    }

    #[test]
    fn test_decode_ping_without_data() {
        let req: ClientRequest = serde_json::from_str(r#"{"type":"ping"}"#).expect("decode");
        assert_eq!(req, ClientRequest::Ping);
    }

    #[test]
    fn test_unknown_type_rejected() {
        let result = serde_json::from_str::<ClientRequest>(r#"{"type":"new_message","data":{}}"#);
        assert!(result.is_err());
    }
}

//! JSON serialization for WebSocket frames.

use super::envelope::Envelope;
use super::types::ClientRequest;

/// Serialize an outbound envelope to a text frame payload.
pub fn serialize_envelope(envelope: &Envelope) -> Result<String, serde_json::Error> {
    serde_json::to_string(envelope)
}

/// Deserialize a client request from a text frame payload.
pub fn deserialize_request(text: &str) -> Result<ClientRequest, serde_json::Error> {
    serde_json::from_str(text)
}

/// Deserialize a client request from a binary frame payload.
pub fn deserialize_request_bytes(bytes: &[u8]) -> Result<ClientRequest, serde_json::Error> {
    serde_json::from_slice(bytes)
}

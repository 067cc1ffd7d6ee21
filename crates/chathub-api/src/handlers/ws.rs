//! WebSocket upgrade handler.

use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::Response;
use futures::{SinkExt, StreamExt, future};
use tracing::info;

use chathub_core::types::UserId;
use chathub_realtime::WireMessage;

use crate::extractors::AuthUser;
use crate::state::AppState;

/// GET /ws?token={jwt}: authenticates before upgrading.
pub async fn ws_upgrade(
    State(state): State<AppState>,
    auth: AuthUser,
    ws: WebSocketUpgrade,
) -> Response {
    ws.on_upgrade(move |socket| handle_ws_connection(state, auth.user_id, socket))
}

/// Hands an established WebSocket to the hub, which owns it from here on.
async fn handle_ws_connection(state: AppState, user_id: UserId, socket: WebSocket) {
    let (ws_tx, ws_rx) = socket.split();

    let inbound = ws_rx.map(|result| result.map(from_axum));
    let outbound = ws_tx.with(|frame: WireMessage| future::ready(Ok::<_, axum::Error>(into_axum(frame))));

    let adapter = state.hub.register(user_id, inbound, outbound);

    info!(
        conn_id = %adapter.id,
        user_id = %user_id,
        "WebSocket connection established"
    );
}

fn from_axum(message: Message) -> WireMessage {
    match message {
        Message::Text(text) => WireMessage::Text(text.as_str().to_owned()),
        Message::Binary(bytes) => WireMessage::Binary(bytes),
        Message::Ping(bytes) => WireMessage::Ping(bytes),
        Message::Pong(bytes) => WireMessage::Pong(bytes),
        Message::Close(_) => WireMessage::Close,
    }
}

fn into_axum(frame: WireMessage) -> Message {
    match frame {
        WireMessage::Text(text) => Message::Text(text.into()),
        WireMessage::Binary(bytes) => Message::Binary(bytes),
        WireMessage::Ping(bytes) => Message::Ping(bytes),
        WireMessage::Pong(bytes) => Message::Pong(bytes),
        WireMessage::Close => Message::Close(None),
    }
}

//! Routes decoded client requests into hub dispatches.

use chrono::Utc;
use tracing::{debug, trace, warn};

use chathub_core::types::{ChatId, UserId};

use crate::hub::{DispatchReport, Hub};
use crate::message::builder::{build_message_read, build_typing};
use crate::message::types::ClientRequest;
use crate::metrics::HubMetrics;

use super::scope::Scope;

/// Turns client requests into events for the other members of a chat.
///
/// The sender identity always comes from the connection, never from the
/// frame, and nothing is ever queued back onto the sender's own connection.
#[derive(Debug, Clone)]
pub struct InboundRouter {
    hub: Hub,
}

impl InboundRouter {
    /// Create a router dispatching through `hub`.
    pub fn new(hub: Hub) -> Self {
        Self { hub }
    }

    /// Handle one request from `origin`. Returns the dispatch outcome when
    /// the request produced an event.
    pub async fn route(&self, origin: UserId, request: ClientRequest) -> Option<DispatchReport> {
        HubMetrics::inc(&self.hub.counters().requests_received);

        match request {
            ClientRequest::MessageRead {
                chat_id,
                message_id,
            } => {
                if !self.is_member(chat_id, origin).await {
                    return None;
                }
                let envelope = build_message_read(chat_id, message_id, origin, Utc::now());
                Some(
                    self.hub
                        .dispatch(envelope, Scope::chat_except(chat_id, origin))
                        .await,
                )
            }
            ClientRequest::Typing { chat_id } => {
                if !self.is_member(chat_id, origin).await {
                    return None;
                }
                Some(
                    self.hub
                        .dispatch(build_typing(chat_id, origin), Scope::chat_except(chat_id, origin))
                        .await,
                )
            }
            ClientRequest::Ack { message_id } => {
                debug!(user_id = %origin, message_id, "Message acknowledged");
                None
            }
            ClientRequest::Ping => {
                trace!(user_id = %origin, "Client ping");
                None
            }
        }
    }

    async fn is_member(&self, chat_id: ChatId, user_id: UserId) -> bool {
        match self.hub.resolver().members_of(chat_id).await {
            Ok(members) if members.contains(&user_id) => true,
            Ok(_) => {
                warn!(chat_id = %chat_id, user_id = %user_id, "Request for a chat the user is not a member of");
                false
            }
            Err(e) => {
                warn!(chat_id = %chat_id, error = %e, "Chat membership lookup failed");
                false
            }
        }
    }
}

//! Resolver trait injected into the hub.

use std::collections::HashSet;

use async_trait::async_trait;

use chathub_core::AppResult;
use chathub_core::types::{ChatId, UserId};

/// Translates a chat identifier into its member set.
///
/// Called on the dispatch path for chat-scoped events, so implementations
/// should answer from memory or a fast cache rather than a slow backend.
#[async_trait]
pub trait ChatMembershipResolver: Send + Sync + std::fmt::Debug {
    /// Returns the members of `chat_id`. Unknown chats yield an empty set.
    async fn members_of(&self, chat_id: ChatId) -> AppResult<HashSet<UserId>>;
}

//! In-process membership cache kept current by the service layer.

use std::collections::HashSet;

use async_trait::async_trait;
use dashmap::DashMap;

use chathub_core::AppResult;
use chathub_core::types::{ChatId, UserId};

use super::resolver::ChatMembershipResolver;

/// Chat ID → member set, updated whenever membership changes upstream.
#[derive(Debug, Default)]
pub struct MembershipCache {
    chats: DashMap<ChatId, HashSet<UserId>>,
}

impl MembershipCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self {
            chats: DashMap::new(),
        }
    }

    /// Replaces the member set of a chat.
    pub fn set_members(&self, chat_id: ChatId, members: impl IntoIterator<Item = UserId>) {
        self.chats.insert(chat_id, members.into_iter().collect());
    }

    /// Adds one member. Returns false if already present.
    pub fn add_member(&self, chat_id: ChatId, user_id: UserId) -> bool {
        self.chats.entry(chat_id).or_default().insert(user_id)
    }

    /// Removes one member. Returns false if absent.
    pub fn remove_member(&self, chat_id: ChatId, user_id: UserId) -> bool {
        let Some(mut members) = self.chats.get_mut(&chat_id) else {
            return false;
        };
        let removed = members.remove(&user_id);
        let now_empty = members.is_empty();
        drop(members);
        if now_empty {
            self.chats.remove_if(&chat_id, |_, m| m.is_empty());
        }
        removed
    }

    /// Forgets a chat, returning its last known members.
    pub fn remove_chat(&self, chat_id: ChatId) -> Option<HashSet<UserId>> {
        self.chats.remove(&chat_id).map(|(_, members)| members)
    }

    /// Whether the user is a known member of the chat.
    pub fn is_member(&self, chat_id: ChatId, user_id: UserId) -> bool {
        self.chats
            .get(&chat_id)
            .is_some_and(|members| members.contains(&user_id))
    }

    /// Number of cached chats.
    pub fn chat_count(&self) -> usize {
        self.chats.len()
    }
}

#[async_trait]
impl ChatMembershipResolver for MembershipCache {
    async fn members_of(&self, chat_id: ChatId) -> AppResult<HashSet<UserId>> {
        Ok(self
            .chats
            .get(&chat_id)
            .map(|members| members.value().clone())
            .unwrap_or_default())
    }
}

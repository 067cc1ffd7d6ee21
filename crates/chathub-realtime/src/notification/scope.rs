//! Fanout scopes: who an event is addressed to.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use chathub_core::types::{ChatId, UserId};

/// Target selection for a dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scope {
    /// One user.
    ToUser(UserId),
    /// Every member of a chat except the originating user.
    ToChatExcept {
        /// Chat whose members receive the event.
        chat_id: ChatId,
        /// Originating user, never a target.
        exclude: UserId,
    },
    /// An explicit set of users, for events whose recipients the caller
    /// already knows (e.g. members of a chat that no longer exists).
    ToUsers(Vec<UserId>),
}

impl Scope {
    /// Targets chat members minus the sender.
    pub fn chat_except(chat_id: ChatId, exclude: UserId) -> Self {
        Self::ToChatExcept { chat_id, exclude }
    }

    /// Turns a resolved member set into the target set for a chat scope.
    pub(crate) fn without_excluded(members: HashSet<UserId>, exclude: UserId) -> HashSet<UserId> {
        members.into_iter().filter(|u| *u != exclude).collect()
    }
}

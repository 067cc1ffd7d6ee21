//! Connection registry: the authoritative map from user to live adapter.

use std::sync::Arc;

use dashmap::DashMap;

use chathub_core::types::UserId;

use super::handle::{ConnectionAdapter, ConnectionId};

/// Thread-safe map holding at most one adapter per user.
///
/// Every mutation is a single locked operation on the key's shard:
/// replacement returns the superseded adapter, and removal only succeeds
/// while the entry is still the adapter the caller names.
#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    /// User ID → the user's current connection.
    members: DashMap<UserId, Arc<ConnectionAdapter>>,
}

impl ConnectionRegistry {
    /// Creates a new empty registry.
    pub fn new() -> Self {
        Self {
            members: DashMap::new(),
        }
    }

    /// Inserts an adapter, returning the one it superseded (if any).
    ///
    /// The caller owns closing the returned adapter.
    pub fn insert(&self, adapter: Arc<ConnectionAdapter>) -> Option<Arc<ConnectionAdapter>> {
        self.members.insert(adapter.owner, adapter)
    }

    /// Gets the current adapter for a user.
    pub fn get(&self, user_id: &UserId) -> Option<Arc<ConnectionAdapter>> {
        self.members.get(user_id).map(|entry| entry.value().clone())
    }

    /// Removes the user's entry only if it is still `conn_id`.
    pub fn remove_if_current(
        &self,
        user_id: &UserId,
        conn_id: &ConnectionId,
    ) -> Option<Arc<ConnectionAdapter>> {
        self.members
            .remove_if(user_id, |_, current| current.id == *conn_id)
            .map(|(_, adapter)| adapter)
    }

    /// Removes and returns every adapter.
    pub fn drain(&self) -> Vec<Arc<ConnectionAdapter>> {
        let users: Vec<UserId> = self.members.iter().map(|entry| *entry.key()).collect();
        users
            .into_iter()
            .filter_map(|user_id| self.members.remove(&user_id).map(|(_, adapter)| adapter))
            .collect()
    }

    /// Checks if a user currently has a registered connection.
    pub fn contains(&self, user_id: &UserId) -> bool {
        self.members.contains_key(user_id)
    }

    /// Returns the number of registered connections.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Returns true when no connection is registered.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Returns all connected user IDs.
    pub fn connected_user_ids(&self) -> Vec<UserId> {
        self.members.iter().map(|entry| *entry.key()).collect()
    }
}

//! The fanout hub: registration, unregistration, and event dispatch.

use std::collections::HashSet;
use std::fmt::Display;
use std::sync::Arc;

use futures::{Sink, Stream};
use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

use chathub_core::AppResult;
use chathub_core::config::RealtimeConfig;
use chathub_core::types::UserId;

use crate::connection::handle::{ConnectionAdapter, ConnectionInfo, OutboundReceiver};
use crate::connection::pool::ConnectionRegistry;
use crate::connection::pump;
use crate::membership::ChatMembershipResolver;
use crate::message::envelope::Envelope;
use crate::message::types::WireMessage;
use crate::metrics::{HubMetrics, MetricsSnapshot};
use crate::notification::dedup::DedupTracker;
use crate::notification::scope::Scope;

/// Outcome of one dispatch call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchReport {
    /// The dedup key was already live; nothing was sent.
    pub deduplicated: bool,
    /// Resolved target count.
    pub targets: usize,
    /// Envelopes queued.
    pub delivered: usize,
    /// Targets without a connection.
    pub offline: usize,
    /// Targets whose connection was torn down for a full queue.
    pub evicted: usize,
    /// Target lookup failed; nothing was sent and the dedup key was not
    /// recorded, so the caller may retry.
    pub resolve_failed: bool,
}

/// Central real-time hub shared by the transport layer and service code.
///
/// Cheap to clone; all state lives behind `Arc`s.
#[derive(Clone)]
pub struct Hub {
    /// Live connections, one per user.
    registry: Arc<ConnectionRegistry>,
    /// Duplicate suppression.
    dedup: Arc<DedupTracker>,
    /// Chat membership lookup.
    resolver: Arc<dyn ChatMembershipResolver>,
    /// Counters.
    metrics: Arc<HubMetrics>,
    /// Configuration.
    config: Arc<RealtimeConfig>,
    /// Stops background tasks.
    shutdown: CancellationToken,
}

impl std::fmt::Debug for Hub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Hub")
            .field("connections", &self.registry.len())
            .field("dedup_keys", &self.dedup.len())
            .finish()
    }
}

impl Hub {
    /// Creates a hub resolving chat members through `resolver`.
    pub fn new(config: RealtimeConfig, resolver: Arc<dyn ChatMembershipResolver>) -> Self {
        let dedup = Arc::new(DedupTracker::new(config.dedup_ttl()));

        info!(
            queue_capacity = config.queue_capacity,
            dedup_ttl_seconds = config.dedup_ttl_seconds,
            "Real-time hub initialized"
        );

        Self {
            registry: Arc::new(ConnectionRegistry::new()),
            dedup,
            resolver,
            metrics: Arc::new(HubMetrics::new()),
            config: Arc::new(config),
            shutdown: CancellationToken::new(),
        }
    }

    /// Registers an authenticated connection and spawns its two pumps.
    ///
    /// Any previous connection of the same user is closed.
    pub fn register<S, E, K>(&self, user_id: UserId, stream: S, sink: K) -> Arc<ConnectionAdapter>
    where
        S: Stream<Item = Result<WireMessage, E>> + Send + 'static,
        E: Display + Send + 'static,
        K: Sink<WireMessage> + Send + 'static,
        K::Error: Display + Send,
    {
        let (adapter, outbound) = self.attach(user_id);

        tokio::spawn(pump::run_outbound(
            self.clone(),
            adapter.clone(),
            outbound,
            sink,
        ));
        tokio::spawn(pump::run_inbound(self.clone(), adapter.clone(), stream));

        adapter
    }

    /// Creates and registers an adapter without spawning pumps.
    ///
    /// The caller drains the returned receiver. Any previous connection of
    /// the same user is closed.
    pub fn attach(&self, user_id: UserId) -> (Arc<ConnectionAdapter>, OutboundReceiver) {
        let (adapter, outbound) = ConnectionAdapter::new(user_id, self.config.queue_capacity);

        if let Some(previous) = self.registry.insert(adapter.clone()) {
            previous.close();
            HubMetrics::inc(&self.metrics.connections_superseded);
            info!(
                user_id = %user_id,
                conn_id = %previous.id,
                new_conn_id = %adapter.id,
                "Connection superseded by a newer registration"
            );
        }

        HubMetrics::inc(&self.metrics.connections_registered);
        info!(conn_id = %adapter.id, user_id = %user_id, "Connection registered");

        (adapter, outbound)
    }

    /// Removes the adapter if it is still the user's current connection,
    /// and closes it either way.
    ///
    /// Safe to call any number of times from any task. Returns whether a
    /// registry entry was removed.
    pub fn unregister(&self, adapter: &ConnectionAdapter) -> bool {
        let removed = self
            .registry
            .remove_if_current(&adapter.owner, &adapter.id)
            .is_some();
        adapter.close();

        if removed {
            HubMetrics::inc(&self.metrics.connections_closed);
            info!(conn_id = %adapter.id, user_id = %adapter.owner, "Connection unregistered");
        }
        removed
    }

    /// Tears down a connection whose queue is full. Returns whether the
    /// registry entry was removed by this call.
    fn evict(&self, adapter: &ConnectionAdapter) -> bool {
        let removed = self
            .registry
            .remove_if_current(&adapter.owner, &adapter.id)
            .is_some();
        adapter.close();

        if removed {
            HubMetrics::inc(&self.metrics.connections_evicted);
            warn!(
                conn_id = %adapter.id,
                user_id = %adapter.owner,
                capacity = adapter.capacity(),
                "Outbound queue full, connection evicted"
            );
        }
        removed
    }

    /// Delivers an event to every connected target in `scope`.
    ///
    /// Never blocks on a connection and never fails: offline targets get
    /// nothing, a full queue costs its owner the connection, and a live dedup
    /// key skips the whole call. The key is recorded only once targets are
    /// resolved, so a failed lookup leaves the event retryable.
    pub async fn dispatch(&self, envelope: Envelope, scope: Scope) -> DispatchReport {
        let mut report = DispatchReport::default();

        let targets = match self.resolve_targets(&scope).await {
            Ok(targets) => targets,
            Err(e) => {
                HubMetrics::inc(&self.metrics.resolve_failures);
                warn!(kind = %envelope.kind, error = %e, "Target lookup failed, event not dispatched");
                report.resolve_failed = true;
                return report;
            }
        };

        if let Some(key) = envelope.dedup_key.as_deref() {
            if self.dedup.seen_or_mark(key) {
                HubMetrics::inc(&self.metrics.events_deduplicated);
                trace!(kind = %envelope.kind, dedup_key = %key, "Duplicate event suppressed");
                report.deduplicated = true;
                return report;
            }
        }
        HubMetrics::inc(&self.metrics.events_dispatched);
        report.targets = targets.len();

        let envelope = Arc::new(envelope);
        for user_id in targets {
            let Some(adapter) = self.registry.get(&user_id) else {
                report.offline += 1;
                continue;
            };
            if adapter.enqueue(envelope.clone()) {
                report.delivered += 1;
            } else if self.evict(&adapter) {
                report.evicted += 1;
            } else {
                // Closed by a concurrent unregister or supersede.
                report.offline += 1;
            }
        }

        HubMetrics::add(&self.metrics.envelopes_delivered, report.delivered as u64);
        HubMetrics::add(&self.metrics.targets_offline, report.offline as u64);

        debug!(
            kind = %envelope.kind,
            targets = report.targets,
            delivered = report.delivered,
            offline = report.offline,
            evicted = report.evicted,
            "Event dispatched"
        );

        report
    }

    /// Sends to a single user.
    pub async fn dispatch_to_user(&self, envelope: Envelope, user_id: UserId) -> DispatchReport {
        self.dispatch(envelope, Scope::ToUser(user_id)).await
    }

    async fn resolve_targets(&self, scope: &Scope) -> AppResult<HashSet<UserId>> {
        Ok(match scope {
            Scope::ToUser(user_id) => HashSet::from([*user_id]),
            Scope::ToUsers(users) => users.iter().copied().collect(),
            Scope::ToChatExcept { chat_id, exclude } => {
                let members = self.resolver.members_of(*chat_id).await?;
                Scope::without_excluded(members, *exclude)
            }
        })
    }

    /// Starts the periodic dedup sweeper. It stops on [`Hub::shutdown`].
    pub fn spawn_dedup_sweeper(&self) -> JoinHandle<()> {
        self.dedup
            .clone()
            .spawn_sweeper(self.config.dedup_sweep_interval(), self.shutdown.clone())
    }

    /// Stops background tasks and closes every connection.
    pub async fn shutdown(&self) {
        info!("Shutting down real-time hub");
        self.shutdown.cancel();

        let adapters = self.registry.drain();
        for adapter in &adapters {
            adapter.close();
        }
        HubMetrics::add(&self.metrics.connections_closed, adapters.len() as u64);

        info!(count = adapters.len(), "All connections closed");
    }

    /// Checks if a user is currently connected.
    pub fn is_connected(&self, user_id: &UserId) -> bool {
        self.registry.contains(user_id)
    }

    /// Returns the number of live connections.
    pub fn connection_count(&self) -> usize {
        self.registry.len()
    }

    /// Returns all connected user IDs.
    pub fn connected_users(&self) -> Vec<UserId> {
        self.registry.connected_user_ids()
    }

    /// Snapshot of a user's connection, if any.
    pub fn connection_info(&self, user_id: &UserId) -> Option<ConnectionInfo> {
        self.registry.get(user_id).map(|adapter| adapter.info())
    }

    /// Returns the user's current adapter, if any.
    pub fn connection(&self, user_id: &UserId) -> Option<Arc<ConnectionAdapter>> {
        self.registry.get(user_id)
    }

    /// Counter snapshot.
    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    pub(crate) fn counters(&self) -> &HubMetrics {
        &self.metrics
    }

    /// Duplicate tracker.
    pub fn dedup(&self) -> &DedupTracker {
        &self.dedup
    }

    /// Membership resolver.
    pub fn resolver(&self) -> &Arc<dyn ChatMembershipResolver> {
        &self.resolver
    }

    /// Configuration.
    pub fn config(&self) -> &RealtimeConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::membership::MembershipCache;

    fn hub(queue_capacity: usize) -> Hub {
        let config = RealtimeConfig {
            queue_capacity,
            ..RealtimeConfig::default()
        };
        Hub::new(config, Arc::new(MembershipCache::new()))
    }

    #[tokio::test]
    async fn test_evict_of_superseded_adapter_is_not_counted() {
        let hub = hub(1);
        let (old, _rx1) = hub.attach(UserId(1));
        let (_new, _rx2) = hub.attach(UserId(1));

        assert!(!old.enqueue(Arc::new(Envelope::new("a", json!({})))));
        assert!(!hub.evict(&old));
        assert!(hub.is_connected(&UserId(1)));
        assert_eq!(hub.metrics().connections_evicted, 0);
    }

    #[tokio::test]
    async fn test_evicted_count_matches_metrics() {
        let hub = hub(1);
        let (slow, _rx) = hub.attach(UserId(2));
        assert!(slow.enqueue(Arc::new(Envelope::new("fill", json!({})))));

        let report = hub
            .dispatch_to_user(Envelope::new("b", json!({})), UserId(2))
            .await;
        assert_eq!(report.evicted, 1);
        assert_eq!(report.offline, 0);
        assert_eq!(hub.metrics().connections_evicted, 1);

        let report = hub
            .dispatch_to_user(Envelope::new("c", json!({})), UserId(2))
            .await;
        assert_eq!(report.evicted, 0);
        assert_eq!(report.offline, 1);
    }
}

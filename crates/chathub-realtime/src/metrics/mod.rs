//! Hub metrics.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Hub-level counters.
#[derive(Debug, Default)]
pub struct HubMetrics {
    /// Connections registered
    pub connections_registered: AtomicU64,
    /// Connections closed because the same user registered again
    pub connections_superseded: AtomicU64,
    /// Connections removed by unregister (peer gone, protocol error, shutdown)
    pub connections_closed: AtomicU64,
    /// Connections torn down because their queue was full
    pub connections_evicted: AtomicU64,
    /// Dispatch calls that passed dedup
    pub events_dispatched: AtomicU64,
    /// Dispatch calls suppressed by dedup
    pub events_deduplicated: AtomicU64,
    /// Envelopes placed on an outbound queue
    pub envelopes_delivered: AtomicU64,
    /// Targets skipped because they had no connection
    pub targets_offline: AtomicU64,
    /// Dispatches dropped because target lookup failed
    pub resolve_failures: AtomicU64,
    /// Client requests decoded
    pub requests_received: AtomicU64,
    /// Client frames that failed to decode
    pub decode_failures: AtomicU64,
}

impl HubMetrics {
    /// Create new zeroed metrics
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `n` to a counter.
    pub fn add(counter: &AtomicU64, n: u64) {
        if n > 0 {
            counter.fetch_add(n, Ordering::Relaxed);
        }
    }

    /// Increment a counter.
    pub fn inc(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Get a snapshot of all metrics
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            connections_registered: self.connections_registered.load(Ordering::Relaxed),
            connections_superseded: self.connections_superseded.load(Ordering::Relaxed),
            connections_closed: self.connections_closed.load(Ordering::Relaxed),
            connections_evicted: self.connections_evicted.load(Ordering::Relaxed),
            events_dispatched: self.events_dispatched.load(Ordering::Relaxed),
            events_deduplicated: self.events_deduplicated.load(Ordering::Relaxed),
            envelopes_delivered: self.envelopes_delivered.load(Ordering::Relaxed),
            targets_offline: self.targets_offline.load(Ordering::Relaxed),
            resolve_failures: self.resolve_failures.load(Ordering::Relaxed),
            requests_received: self.requests_received.load(Ordering::Relaxed),
            decode_failures: self.decode_failures.load(Ordering::Relaxed),
        }
    }
}

/// Serializable metrics snapshot
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    /// Connections registered
    pub connections_registered: u64,
    /// Connections superseded by a newer registration
    pub connections_superseded: u64,
    /// Connections unregistered
    pub connections_closed: u64,
    /// Connections evicted for a full queue
    pub connections_evicted: u64,
    /// Dispatches that passed dedup
    pub events_dispatched: u64,
    /// Dispatches suppressed by dedup
    pub events_deduplicated: u64,
    /// Envelopes queued
    pub envelopes_delivered: u64,
    /// Offline targets skipped
    pub targets_offline: u64,
    /// Dispatches dropped on lookup failure
    pub resolve_failures: u64,
    /// Client requests decoded
    pub requests_received: u64,
    /// Client frames that failed to decode
    pub decode_failures: u64,
}

//! Deduplication of events emitted from more than one call site.

use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

/// Time-windowed set of recently dispatched dedup keys.
///
/// A key suppresses further dispatches for `ttl` after it was first marked.
/// Expired entries stop suppressing immediately; the sweeper only reclaims
/// their memory.
#[derive(Debug)]
pub struct DedupTracker {
    /// Window duration
    ttl: Duration,
    /// First-seen time per key
    seen: DashMap<String, Instant>,
}

impl DedupTracker {
    /// Create a new tracker with the given window
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            seen: DashMap::new(),
        }
    }

    /// Atomic check-and-set.
    ///
    /// Returns `true` if the key is already live (caller should skip), or
    /// `false` if this call marked it (caller proceeds).
    pub fn seen_or_mark(&self, key: &str) -> bool {
        let now = Instant::now();
        match self.seen.entry(key.to_string()) {
            Entry::Occupied(mut entry) => {
                if now.duration_since(*entry.get()) < self.ttl {
                    return true;
                }
                entry.insert(now);
                false
            }
            Entry::Vacant(entry) => {
                entry.insert(now);
                false
            }
        }
    }

    /// Whether the key currently suppresses dispatches.
    pub fn is_live(&self, key: &str) -> bool {
        self.seen
            .get(key)
            .is_some_and(|marked| marked.elapsed() < self.ttl)
    }

    /// Drop expired entries, returning how many were removed.
    pub fn sweep(&self) -> usize {
        let before = self.seen.len();
        let ttl = self.ttl;
        self.seen.retain(|_, marked| marked.elapsed() < ttl);
        before.saturating_sub(self.seen.len())
    }

    /// Number of tracked keys, expired-but-unswept ones included.
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    /// Returns true when no key is tracked.
    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }

    /// Configured window.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Spawn the single periodic sweeper; it stops when `shutdown` fires.
    pub fn spawn_sweeper(
        self: Arc<Self>,
        interval: Duration,
        shutdown: CancellationToken,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            ticker.tick().await;

            loop {
                tokio::select! {
                    _ = shutdown.cancelled() => break,
                    _ = ticker.tick() => {
                        let removed = self.sweep();
                        if removed > 0 {
                            tracing::trace!(removed, remaining = self.len(), "Swept dedup keys");
                        }
                    }
                }
            }

            tracing::debug!("Dedup sweeper stopped");
        })
    }
}

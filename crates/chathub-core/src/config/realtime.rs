//! Real-time fanout hub configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Real-time (WebSocket) hub configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RealtimeConfig {
    /// Capacity of each connection's outbound queue.
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
    /// How long a dedup key suppresses repeated dispatches, in seconds.
    #[serde(default = "default_dedup_ttl")]
    pub dedup_ttl_seconds: u64,
    /// Tick of the dedup sweeper, in seconds.
    #[serde(default = "default_dedup_sweep")]
    pub dedup_sweep_interval_seconds: u64,
    /// WebSocket ping interval in seconds (0 disables pings).
    #[serde(default = "default_ping_interval")]
    pub ping_interval_seconds: u64,
    /// Close a connection that sent nothing for this many seconds (0 disables).
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_seconds: u64,
    /// Maximum time a single socket write may take, in seconds.
    #[serde(default = "default_write_timeout")]
    pub write_timeout_seconds: u64,
}

impl RealtimeConfig {
    /// Dedup window.
    pub fn dedup_ttl(&self) -> Duration {
        Duration::from_secs(self.dedup_ttl_seconds)
    }

    /// Dedup sweeper tick, never shorter than one second.
    pub fn dedup_sweep_interval(&self) -> Duration {
        Duration::from_secs(self.dedup_sweep_interval_seconds.max(1))
    }

    /// Keepalive ping interval, `None` when disabled.
    pub fn ping_interval(&self) -> Option<Duration> {
        non_zero_secs(self.ping_interval_seconds)
    }

    /// Inbound idle timeout, `None` when disabled.
    pub fn idle_timeout(&self) -> Option<Duration> {
        non_zero_secs(self.idle_timeout_seconds)
    }

    /// Per-write timeout, never shorter than one second.
    pub fn write_timeout(&self) -> Duration {
        Duration::from_secs(self.write_timeout_seconds.max(1))
    }
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            queue_capacity: default_queue_capacity(),
            dedup_ttl_seconds: default_dedup_ttl(),
            dedup_sweep_interval_seconds: default_dedup_sweep(),
            ping_interval_seconds: default_ping_interval(),
            idle_timeout_seconds: default_idle_timeout(),
            write_timeout_seconds: default_write_timeout(),
        }
    }
}

fn non_zero_secs(secs: u64) -> Option<Duration> {
    (secs > 0).then(|| Duration::from_secs(secs))
}

fn default_queue_capacity() -> usize {
    256
}

fn default_dedup_ttl() -> u64 {
    60
}

fn default_dedup_sweep() -> u64 {
    15
}

fn default_ping_interval() -> u64 {
    30
}

fn default_idle_timeout() -> u64 {
    90
}

fn default_write_timeout() -> u64 {
    10
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RealtimeConfig::default();
        assert_eq!(config.queue_capacity, 256);
        assert_eq!(config.dedup_ttl(), Duration::from_secs(60));
        assert_eq!(config.ping_interval(), Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_zero_disables_keepalive() {
        let config: RealtimeConfig =
            serde_json::from_str(r#"{"ping_interval_seconds":0,"idle_timeout_seconds":0}"#)
                .expect("deserialize");
        assert_eq!(config.ping_interval(), None);
        assert_eq!(config.idle_timeout(), None);
        assert_eq!(config.queue_capacity, 256);
    }
}

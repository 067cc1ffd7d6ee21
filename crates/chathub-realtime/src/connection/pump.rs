//! Per-connection read and write loops.
//!
//! Both pumps end through [`Hub::unregister`]: whichever side fails first
//! unregisters, which closes the queue (ending the outbound pump once it has
//! drained) and cancels the adapter (ending the inbound pump).

use std::fmt::Display;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use futures::{Sink, SinkExt, Stream, StreamExt};
use tokio::time::{self, Instant, Interval, MissedTickBehavior};
use tracing::{debug, error, warn};

use crate::hub::Hub;
use crate::message::serializer::{
    deserialize_request, deserialize_request_bytes, serialize_envelope,
};
use crate::message::types::WireMessage;
use crate::metrics::HubMetrics;
use crate::notification::router::InboundRouter;

use super::handle::{ConnectionAdapter, OutboundReceiver};

/// Read loop: decodes client frames and routes them until the connection ends.
pub async fn run_inbound<S, E>(hub: Hub, adapter: Arc<ConnectionAdapter>, stream: S)
where
    S: Stream<Item = Result<WireMessage, E>>,
    E: Display,
{
    futures::pin_mut!(stream);
    let idle_timeout = hub.config().idle_timeout();
    let router = InboundRouter::new(hub.clone());

    let reason = loop {
        let next = tokio::select! {
            _ = adapter.closed() => break "closed by hub",
            next = next_frame(&mut stream, idle_timeout) => next,
        };

        let frame = match next {
            Err(_) => break "idle timeout",
            Ok(None) => break "stream ended",
            Ok(Some(Err(e))) => {
                warn!(conn_id = %adapter.id, user_id = %adapter.owner, error = %e, "WebSocket read error");
                break "read error";
            }
            Ok(Some(Ok(frame))) => frame,
        };

        let decoded = match frame {
            WireMessage::Text(text) => deserialize_request(&text),
            WireMessage::Binary(bytes) => deserialize_request_bytes(&bytes),
            WireMessage::Ping(_) | WireMessage::Pong(_) => continue,
            WireMessage::Close => break "peer closed",
        };

        match decoded {
            Ok(request) => {
                router.route(adapter.owner, request).await;
            }
            Err(e) => {
                HubMetrics::inc(&hub.counters().decode_failures);
                warn!(conn_id = %adapter.id, user_id = %adapter.owner, error = %e, "Undecodable client frame");
                break "decode error";
            }
        }
    };

    hub.unregister(&adapter);
    debug!(conn_id = %adapter.id, user_id = %adapter.owner, reason, "Inbound pump stopped");
}

async fn next_frame<T>(
    stream: &mut T,
    idle_timeout: Option<Duration>,
) -> Result<Option<T::Item>, time::error::Elapsed>
where
    T: Stream + Unpin,
{
    match idle_timeout {
        Some(limit) => time::timeout(limit, stream.next()).await,
        None => Ok(stream.next().await),
    }
}

/// Write loop: drains the outbound queue onto the socket, with keepalive pings.
pub async fn run_outbound<K>(
    hub: Hub,
    adapter: Arc<ConnectionAdapter>,
    mut outbound: OutboundReceiver,
    sink: K,
) where
    K: Sink<WireMessage>,
    K::Error: Display,
{
    futures::pin_mut!(sink);
    let write_timeout = hub.config().write_timeout();
    let mut ping = hub.config().ping_interval().map(|period| {
        let mut interval = time::interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        interval
    });

    loop {
        let frame = tokio::select! {
            biased;
            next = outbound.recv() => match next {
                Some(envelope) => match serialize_envelope(&envelope) {
                    Ok(text) => WireMessage::Text(text),
                    Err(e) => {
                        error!(kind = %envelope.kind, error = %e, "Failed to serialize envelope");
                        continue;
                    }
                },
                None => {
                    let _ = write_frame(&mut sink, WireMessage::Close, write_timeout).await;
                    let _ = time::timeout(write_timeout, sink.close()).await;
                    debug!(conn_id = %adapter.id, user_id = %adapter.owner, "Outbound pump stopped");
                    return;
                }
            },
            _ = next_ping(&mut ping) => WireMessage::Ping(Bytes::new()),
        };

        if let Err(reason) = write_frame(&mut sink, frame, write_timeout).await {
            warn!(conn_id = %adapter.id, user_id = %adapter.owner, error = %reason, "WebSocket write failed");
            hub.unregister(&adapter);
            return;
        }
    }
}

async fn write_frame<T>(sink: &mut T, frame: WireMessage, limit: Duration) -> Result<(), String>
where
    T: Sink<WireMessage> + Unpin,
    T::Error: Display,
{
    match time::timeout(limit, sink.send(frame)).await {
        Ok(Ok(())) => Ok(()),
        Ok(Err(e)) => Err(e.to_string()),
        Err(_) => Err(format!("write timed out after {limit:?}")),
    }
}

async fn next_ping(ping: &mut Option<Interval>) {
    match ping {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending().await,
    }
}

#[cfg(test)]
mod tests {
    use futures::channel::mpsc as fmpsc;
    use serde_json::json;

    use chathub_core::config::RealtimeConfig;
    use chathub_core::types::UserId;

    use super::*;
    use crate::membership::MembershipCache;
    use crate::message::envelope::Envelope;

    fn hub(config: RealtimeConfig) -> Hub {
        Hub::new(config, Arc::new(MembershipCache::new()))
    }

    fn quiet_config() -> RealtimeConfig {
        RealtimeConfig {
            ping_interval_seconds: 0,
            idle_timeout_seconds: 0,
            ..RealtimeConfig::default()
        }
    }

    #[tokio::test]
    async fn test_outbound_drains_then_sends_close() {
        let hub = hub(quiet_config());
        let (adapter, outbound) = hub.attach(UserId(1));
        let (sink, mut written) = fmpsc::unbounded::<WireMessage>();

        assert!(adapter.enqueue(Arc::new(Envelope::new("a", json!({})))));
        assert!(adapter.enqueue(Arc::new(Envelope::new("b", json!({})))));
        hub.unregister(&adapter);

        run_outbound(hub.clone(), adapter.clone(), outbound, sink).await;

        let frames: Vec<WireMessage> = written.by_ref().collect().await;
        assert_eq!(frames.len(), 3);
        assert_eq!(frames[0], WireMessage::Text(r#"{"type":"a","data":{}}"#.to_string()));
        assert_eq!(frames[2], WireMessage::Close);
    }

    #[tokio::test]
    async fn test_write_error_unregisters() {
        let hub = hub(quiet_config());
        let (adapter, outbound) = hub.attach(UserId(1));
        let (sink, written) = fmpsc::unbounded::<WireMessage>();
        drop(written);

        assert!(adapter.enqueue(Arc::new(Envelope::new("a", json!({})))));
        run_outbound(hub.clone(), adapter.clone(), outbound, sink).await;

        assert!(adapter.is_closed());
        assert!(!hub.is_connected(&UserId(1)));
    }

    #[tokio::test]
    async fn test_inbound_decode_error_unregisters() {
        let hub = hub(quiet_config());
        let (adapter, _outbound) = hub.attach(UserId(1));
        let frames = futures::stream::iter(vec![
            Ok::<_, String>(WireMessage::Text(r#"{"type":"ping"}"#.to_string())),
            Ok(WireMessage::Text("not json".to_string())),
        ]);

        run_inbound(hub.clone(), adapter.clone(), frames).await;

        assert!(adapter.is_closed());
        assert!(!hub.is_connected(&UserId(1)));
        let metrics = hub.metrics();
        assert_eq!(metrics.requests_received, 1);
        assert_eq!(metrics.decode_failures, 1);
    }

    #[tokio::test]
    async fn test_inbound_exits_when_hub_closes_adapter() {
        let hub = hub(quiet_config());
        let (adapter, _outbound) = hub.attach(UserId(1));
        let (_keep_open, frames) = fmpsc::unbounded::<Result<WireMessage, String>>();

        let task = tokio::spawn(run_inbound(hub.clone(), adapter.clone(), frames));
        hub.unregister(&adapter);
        task.await.expect("inbound pump joined");
    }

    #[tokio::test(start_paused = true)]
    async fn test_inbound_idle_timeout() {
        let config = RealtimeConfig {
            ping_interval_seconds: 0,
            idle_timeout_seconds: 5,
            ..RealtimeConfig::default()
        };
        let hub = hub(config);
        let (adapter, _outbound) = hub.attach(UserId(1));
        let (_keep_open, frames) = fmpsc::unbounded::<Result<WireMessage, String>>();

        run_inbound(hub.clone(), adapter.clone(), frames).await;
        assert!(!hub.is_connected(&UserId(1)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_outbound_sends_keepalive_pings() {
        let config = RealtimeConfig {
            ping_interval_seconds: 10,
            idle_timeout_seconds: 0,
            ..RealtimeConfig::default()
        };
        let hub = hub(config);
        let (adapter, outbound) = hub.attach(UserId(1));
        let (sink, mut written) = fmpsc::unbounded::<WireMessage>();

        let task = tokio::spawn(run_outbound(hub.clone(), adapter.clone(), outbound, sink));
        time::sleep(Duration::from_secs(25)).await;
        hub.unregister(&adapter);
        task.await.expect("outbound pump joined");

        let frames: Vec<WireMessage> = written.by_ref().collect().await;
        let pings = frames
            .iter()
            .filter(|f| matches!(f, WireMessage::Ping(_)))
            .count();
        assert_eq!(pings, 2);
        assert_eq!(frames.last(), Some(&WireMessage::Close));
    }
}

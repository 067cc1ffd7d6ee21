//! Per-connection adapter: a bounded outbound mailbox owned by one user.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use chathub_core::types::UserId;

use crate::message::envelope::Envelope;

/// Unique connection identifier
pub type ConnectionId = Uuid;

/// Receiving end of an adapter's outbound queue, drained by the outbound pump.
pub type OutboundReceiver = mpsc::Receiver<Arc<Envelope>>;

/// A handle to a single live connection.
///
/// Holds the only sender of the outbound queue. Closing the adapter drops
/// that sender, so the outbound pump drains what is queued and then sees the
/// queue end, and cancels the token the inbound pump waits on.
#[derive(Debug)]
pub struct ConnectionAdapter {
    /// Unique connection ID
    pub id: ConnectionId,
    /// User who owns this connection
    pub owner: UserId,
    /// When the connection was established
    pub connected_at: DateTime<Utc>,
    /// Sender for outbound envelopes, taken on close
    sender: Mutex<Option<mpsc::Sender<Arc<Envelope>>>>,
    /// Queue capacity, kept for reporting
    capacity: usize,
    /// Set once by the first `close`
    closed: AtomicBool,
    /// Cancelled on close
    shutdown: CancellationToken,
}

impl ConnectionAdapter {
    /// Create a new adapter and the receiver for its outbound queue.
    pub fn new(owner: UserId, capacity: usize) -> (Arc<Self>, OutboundReceiver) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        let adapter = Arc::new(Self {
            id: Uuid::new_v4(),
            owner,
            connected_at: Utc::now(),
            sender: Mutex::new(Some(tx)),
            capacity: capacity.max(1),
            closed: AtomicBool::new(false),
            shutdown: CancellationToken::new(),
        });
        (adapter, rx)
    }

    /// Try to queue an envelope without waiting.
    ///
    /// Returns `false` if the queue is full or the adapter is closed; the
    /// caller is expected to tear the connection down.
    pub fn enqueue(&self, envelope: Arc<Envelope>) -> bool {
        let guard = self.lock_sender();
        let Some(sender) = guard.as_ref() else {
            return false;
        };
        match sender.try_send(envelope) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(_)) => {
                tracing::debug!(conn_id = %self.id, user_id = %self.owner, "Outbound queue full");
                false
            }
            Err(mpsc::error::TrySendError::Closed(_)) => false,
        }
    }

    /// Close the queue and wake the inbound pump.
    ///
    /// Returns `true` only for the call that actually closed the adapter.
    pub fn close(&self) -> bool {
        if self.closed.swap(true, Ordering::SeqCst) {
            return false;
        }
        self.lock_sender().take();
        self.shutdown.cancel();
        true
    }

    /// Whether `close` has run.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Resolves once the adapter is closed.
    pub async fn closed(&self) {
        self.shutdown.cancelled().await;
    }

    /// Number of envelopes waiting in the outbound queue.
    pub fn queued(&self) -> usize {
        self.lock_sender()
            .as_ref()
            .map(|s| self.capacity - s.capacity())
            .unwrap_or(0)
    }

    /// Outbound queue capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Get a snapshot of connection info
    pub fn info(&self) -> ConnectionInfo {
        ConnectionInfo {
            id: self.id,
            user_id: self.owner,
            connected_at: self.connected_at,
            queued: self.queued(),
            closed: self.is_closed(),
        }
    }

    fn lock_sender(&self) -> MutexGuard<'_, Option<mpsc::Sender<Arc<Envelope>>>> {
        self.sender.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Snapshot of connection info (serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionInfo {
    /// Connection ID
    pub id: ConnectionId,
    /// User ID
    pub user_id: UserId,
    /// Connected at
    pub connected_at: DateTime<Utc>,
    /// Envelopes waiting to be written
    pub queued: usize,
    /// Is closed
    pub closed: bool,
}

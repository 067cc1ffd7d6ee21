//! # chathub-realtime
//!
//! Real-time fanout hub for ChatHub. Provides:
//!
//! - A registry holding at most one live connection per user
//! - Bounded per-connection outbound queues with a producer-never-blocks discipline
//! - Transport-neutral inbound/outbound pumps with keepalive
//! - Time-windowed deduplication of events emitted from more than one call site
//! - Chat fanout through an injected membership resolver

pub mod connection;
pub mod hub;
pub mod membership;
pub mod message;
pub mod metrics;
pub mod notification;

pub use connection::handle::ConnectionAdapter;
pub use connection::pool::ConnectionRegistry;
pub use hub::{DispatchReport, Hub};
pub use membership::{ChatMembershipResolver, MembershipCache};
pub use message::envelope::Envelope;
pub use message::types::{ClientRequest, WireMessage};
pub use notification::dedup::DedupTracker;
pub use notification::scope::Scope;

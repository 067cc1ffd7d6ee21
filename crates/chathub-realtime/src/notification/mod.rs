//! Event delivery support: duplicate suppression, fanout scopes, inbound routing.

pub mod dedup;
pub mod router;
pub mod scope;

pub use dedup::DedupTracker;
pub use router::InboundRouter;
pub use scope::Scope;

//! Connection management: per-user adapters, the registry, and socket pumps.

pub mod handle;
pub mod pool;
pub mod pump;

pub use handle::{ConnectionAdapter, ConnectionId};
pub use pool::ConnectionRegistry;

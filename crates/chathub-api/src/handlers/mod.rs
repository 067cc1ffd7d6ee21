//! Route handlers.

pub mod dispatch;
pub mod health;
pub mod membership;
pub mod stats;
pub mod ws;

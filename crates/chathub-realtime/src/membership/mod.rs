//! Chat membership lookup used to compute fanout targets.

pub mod cache;
pub mod resolver;

pub use cache::MembershipCache;
pub use resolver::ChatMembershipResolver;

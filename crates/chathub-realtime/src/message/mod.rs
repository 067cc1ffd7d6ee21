//! Wire-level message definitions: envelope, frames, client requests, builders.

pub mod builder;
pub mod envelope;
pub mod kinds;
pub mod serializer;
pub mod types;

pub use envelope::Envelope;
pub use types::{ClientRequest, WireMessage};

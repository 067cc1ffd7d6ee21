//! Newtype wrappers around the numeric primary keys of the chat backend.
//!
//! Using distinct types prevents accidentally passing a `ChatId` where a
//! `UserId` is expected. Both serialize as plain JSON numbers so the wire
//! format matches what browser clients already send and receive.

use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Macro to define a newtype ID wrapper around `u64`.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl $name {
            /// Create an identifier from a raw key.
            pub const fn new(raw: u64) -> Self {
                Self(raw)
            }

            /// Return the raw key.
            pub const fn get(self) -> u64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.trim().parse::<u64>().map(Self)
            }
        }

        impl From<u64> for $name {
            fn from(raw: u64) -> Self {
                Self(raw)
            }
        }

        impl From<$name> for u64 {
            fn from(id: $name) -> u64 {
                id.0
            }
        }
    };
}

define_id!(
    /// Identifier of an authenticated principal.
    UserId
);

define_id!(
    /// Identifier of a chat (direct or group conversation).
    ChatId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_id_display() {
        assert_eq!(UserId::new(42).to_string(), "42");
    }

    #[test]
    fn test_chat_id_from_str() {
        let id: ChatId = " 7 ".parse().expect("should parse");
        assert_eq!(id, ChatId(7));
        assert!("seven".parse::<ChatId>().is_err());
    }

    #[test]
    fn test_serializes_as_number() {
        let json = serde_json::to_string(&UserId(5)).expect("serialize");
        assert_eq!(json, "5");
        let parsed: UserId = serde_json::from_str("5").expect("deserialize");
        assert_eq!(parsed, UserId(5));
    }
}

//! Identifier types for rooms and messages.
//!
//! Identifiers are opaque strings. Freshly generated ones are random
//! (`UUIDv4`, simple form), but anything read back from storage is accepted
//! verbatim, including the fixed ids of the demo dataset (`demo-1`, `msg-1`).

use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Random token used for new identifiers.
#[inline]
#[must_use]
fn random_token() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Declare an opaque string identifier with a consistent API.
macro_rules! define_string_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[repr(transparent)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Generate a fresh random identifier.
            #[must_use]
            pub fn generate() -> Self {
                Self(random_token())
            }

            /// Wrap an existing identifier.
            #[must_use]
            pub fn new(raw: impl Into<String>) -> Self {
                Self(raw.into())
            }

            /// Borrow as `&str`.
            #[inline]
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume into `String`.
            #[inline]
            #[must_use]
            pub fn into_string(self) -> String {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }

        impl PartialEq<str> for $name {
            fn eq(&self, other: &str) -> bool {
                self.0 == other
            }
        }

        impl PartialEq<&str> for $name {
            fn eq(&self, other: &&str) -> bool {
                self.0 == *other
            }
        }
    };
}

define_string_id!(
    /// Identifier of a chat room.
    RoomId
);

define_string_id!(
    /// Identifier of a single message.
    MessageId
);

define_string_id!(
    /// Identifier of an authenticated user record.
    UserId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_ids_are_unique() {
        let a = RoomId::generate();
        let b = RoomId::generate();
        assert_ne!(a, b);
        assert_eq!(a.as_str().len(), 32);
    }

    #[test]
    fn test_ids_serialize_transparently() {
        let id = MessageId::new("msg-1");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"msg-1\"");

        let restored: MessageId = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, "msg-1");
    }
}

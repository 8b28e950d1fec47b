//! Identifier types for the board domain.
//!
//! Identifiers are assigned by the remote store and treated as opaque text.

use super::BoardDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

macro_rules! opaque_id {
    ($(#[$meta:meta])* $name:ident, $kind:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Creates a validated identifier.
            ///
            /// # Errors
            ///
            /// Returns [`BoardDomainError::EmptyIdentifier`] when the value is
            /// empty after trimming.
            pub fn new(value: impl Into<String>) -> Result<Self, BoardDomainError> {
                let raw = value.into();
                let trimmed = raw.trim();
                if trimmed.is_empty() {
                    return Err(BoardDomainError::EmptyIdentifier { kind: $kind });
                }
                Ok(Self(trimmed.to_owned()))
            }

            /// Returns the identifier as `str`.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                self.as_str()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

opaque_id!(
    /// Unique identifier for a task on the board.
    TaskId,
    "task"
);

opaque_id!(
    /// Unique identifier for a board list (column).
    ListId,
    "list"
);

opaque_id!(
    /// Reference to a team member in the external directory.
    MemberId,
    "member"
);

opaque_id!(
    /// Reference to a client in the external directory.
    ClientId,
    "client"
);

/// Prefix marking identifiers minted locally before the store confirms them.
const LOCAL_ID_PREFIX: &str = "local-";

impl TaskId {
    /// Creates a placeholder identifier for a task the store has not yet
    /// confirmed.
    #[must_use]
    pub fn local() -> Self {
        Self(format!("{LOCAL_ID_PREFIX}{}", Uuid::new_v4()))
    }

    /// Returns `true` when this identifier was minted locally.
    #[must_use]
    pub fn is_local(&self) -> bool {
        self.0.starts_with(LOCAL_ID_PREFIX)
    }
}

//! Newtype wrappers for domain identifiers.
//!
//! Entrants, matches, brackets and picks reference each other only by id,
//! never by ownership. These wrappers prevent accidentally passing a `PickId`
//! where a `MatchId` is expected.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(s: impl Into<String>) -> Self {
                $name(s.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                $name(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                $name(s.to_string())
            }
        }
    };
}

string_id!(
    /// Identifies an entrant (one of the 64 competitors).
    EntrantId
);

string_id!(
    /// Identifies a match (one of the 63 games in the tournament).
    MatchId
);

string_id!(
    /// Identifies a participant's bracket.
    BracketId
);

string_id!(
    /// Identifies a single pick within a bracket.
    PickId
);

string_id!(
    /// Identifies a user (participant or administrator).
    ///
    /// Users live outside the core; this is only ever compared for equality.
    UserId
);

//! Strongly-typed ID types for domain entities.
//!
//! The identity service issues numeric identifiers. Wrapping them keeps a
//! user id from being passed where a company id is expected.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Error returned when parsing an ID from a string fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIdError {
    /// The type of ID that failed to parse.
    pub id_type: &'static str,
    /// The reason for the parse failure.
    pub reason: String,
}

impl fmt::Display for ParseIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to parse {}: {}", self.id_type, self.reason)
    }
}

impl std::error::Error for ParseIdError {}

/// Macro to generate a strongly-typed numeric ID wrapper.
macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Creates an ID from its raw numeric value.
            #[must_use]
            pub const fn new(value: i64) -> Self {
                Self(value)
            }

            /// Returns the raw numeric value.
            #[must_use]
            pub const fn get(&self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = ParseIdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.trim()
                    .parse::<i64>()
                    .map(Self)
                    .map_err(|e| ParseIdError {
                        id_type: stringify!($name),
                        reason: e.to_string(),
                    })
            }
        }

        impl From<i64> for $name {
            fn from(value: i64) -> Self {
                Self(value)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id!(
    /// Unique identifier for a user account.
    UserId
);

define_id!(
    /// Unique identifier for the company that owns a user account.
    CompanyId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_the_raw_number() {
        assert_eq!(UserId::new(42).to_string(), "42");
        assert_eq!(CompanyId::new(-1).to_string(), "-1");
    }

    #[test]
    fn parse_accepts_surrounding_whitespace() {
        let id: UserId = " 17 ".parse().expect("should parse");
        assert_eq!(id.get(), 17);
    }

    #[test]
    fn parse_invalid_number() {
        let result: Result<CompanyId, _> = "acme".parse();
        let err = result.unwrap_err();
        assert_eq!(err.id_type, "CompanyId");
    }

    #[test]
    fn serializes_as_plain_number() {
        let json = serde_json::to_string(&UserId::new(9)).expect("serialize");
        assert_eq!(json, "9");

        let parsed: CompanyId = serde_json::from_str("12").expect("deserialize");
        assert_eq!(parsed, CompanyId::new(12));
    }

    #[test]
    fn id_hash() {
        use std::collections::HashSet;

        let mut set = HashSet::new();
        set.insert(UserId::new(1));
        set.insert(UserId::new(2));
        set.insert(UserId::new(1));

        assert_eq!(set.len(), 2);
    }
}

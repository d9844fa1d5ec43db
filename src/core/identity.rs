//! Typed entity identifiers
//!
//! Every entity gets a prefixed ULID identifier (e.g. `PRJ-01KCWY20F01B21V0G4E835NW3J`).
//! The prefix makes ids self-describing in logs and CLI output; the ULID part
//! keeps them sortable by creation time.

use std::fmt;
use std::str::FromStr;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;
use ulid::Ulid;

/// Errors that can occur when parsing an entity id
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IdParseError {
    #[error("Invalid id '{input}': expected prefix {expected}")]
    WrongPrefix { input: String, expected: &'static str },

    #[error("Invalid id '{input}': malformed ULID")]
    MalformedUlid { input: String },
}

macro_rules! entity_id {
    ($(#[$doc:meta])* $name:ident, $prefix:literal) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(Ulid);

        impl $name {
            /// Entity prefix for this id type
            pub const PREFIX: &'static str = $prefix;

            /// Generate a fresh id
            pub fn new() -> Self {
                Self(Ulid::new())
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}-{}", Self::PREFIX, self.0)
            }
        }

        impl FromStr for $name {
            type Err = IdParseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let rest = s
                    .strip_prefix(Self::PREFIX)
                    .and_then(|r| r.strip_prefix('-'))
                    .ok_or_else(|| IdParseError::WrongPrefix {
                        input: s.to_string(),
                        expected: Self::PREFIX,
                    })?;
                let ulid = Ulid::from_string(rest).map_err(|_| IdParseError::MalformedUlid {
                    input: s.to_string(),
                })?;
                Ok(Self(ulid))
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.collect_str(self)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let s = String::deserialize(deserializer)?;
                s.parse().map_err(de::Error::custom)
            }
        }
    };
}

entity_id!(
    /// Identifier of a project group (a family of versions)
    GroupId,
    "GRP"
);

entity_id!(
    /// Identifier of a single project version
    ProjectId,
    "PRJ"
);

entity_id!(
    /// Identifier of a document (drawing) row
    DocumentId,
    "DOC"
);

entity_id!(
    /// Identifier of a user account
    UserId,
    "USR"
);

/// Generate a submission receipt id (`RCT-<ulid>`)
pub fn new_receipt_id() -> String {
    format!("RCT-{}", Ulid::new())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_roundtrip() {
        let id = ProjectId::new();
        let parsed: ProjectId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_id_display_prefix() {
        assert!(GroupId::new().to_string().starts_with("GRP-"));
        assert!(ProjectId::new().to_string().starts_with("PRJ-"));
        assert!(DocumentId::new().to_string().starts_with("DOC-"));
        assert!(UserId::new().to_string().starts_with("USR-"));
    }

    #[test]
    fn test_wrong_prefix_rejected() {
        let id = ProjectId::new().to_string();
        let swapped = id.replace("PRJ-", "DOC-");
        assert!(matches!(
            swapped.parse::<ProjectId>(),
            Err(IdParseError::WrongPrefix { .. })
        ));
    }

    #[test]
    fn test_malformed_ulid_rejected() {
        assert!(matches!(
            "PRJ-not-a-ulid".parse::<ProjectId>(),
            Err(IdParseError::MalformedUlid { .. })
        ));
    }

    #[test]
    fn test_receipt_id_format() {
        let receipt = new_receipt_id();
        assert!(receipt.starts_with("RCT-"));
        assert_eq!(receipt.len(), 4 + 26);
    }
}

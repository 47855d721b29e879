//! Prefixed hash IDs for roadmap entities
//!
//! ID format: `{prefix}-{7-char-hash}` (e.g., `m-7f2b4c1` for a milestone,
//! `p-9d3e5f2` for a product).
//!
//! Hash is derived from a label + creation timestamp, ensuring uniqueness.
//! Same label at different times produces different IDs.

use chrono::{DateTime, Utc};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum IdError {
    #[error("Invalid {kind} ID format: expected '{prefix}-{{7-char-hash}}', got '{value}'")]
    InvalidFormat {
        kind: &'static str,
        prefix: &'static str,
        value: String,
    },
}

/// Generates a 7-character hash from a label and timestamp
fn generate_hash(label: &str, timestamp: DateTime<Utc>) -> String {
    let input = format!("{}{}", label, timestamp.timestamp_nanos_opt().unwrap_or(0));
    let hash = blake3::hash(input.as_bytes());
    let hex = hash.to_hex();
    hex[..7].to_string()
}

/// Defines an entity ID type with the common format, parsing and serde glue.
/// All IDs share the same shape; only the prefix and entity name differ.
macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident, $kind:literal, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name {
            hash: String,
        }

        impl $name {
            /// Creates a new ID from a label and timestamp
            pub fn new(label: &str, timestamp: DateTime<Utc>) -> Self {
                Self {
                    hash: generate_hash(label, timestamp),
                }
            }

            /// Returns the hash portion of the ID
            pub fn hash(&self) -> &str {
                &self.hash
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}-{}", $prefix, self.hash)
            }
        }

        impl FromStr for $name {
            type Err = IdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let s = s.trim();
                let invalid = || IdError::InvalidFormat {
                    kind: $kind,
                    prefix: $prefix,
                    value: s.to_string(),
                };

                let hash = s.strip_prefix(concat!($prefix, "-")).ok_or_else(invalid)?;
                if hash.len() != 7 || !hash.chars().all(|c| c.is_ascii_hexdigit()) {
                    return Err(invalid());
                }

                Ok(Self {
                    hash: hash.to_string(),
                })
            }
        }

        impl TryFrom<String> for $name {
            type Error = IdError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                value.parse()
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.to_string()
            }
        }
    };
}

entity_id!(
    /// Product ID in the format `p-{7-char-hash}`
    ProductId,
    "product",
    "p"
);

entity_id!(
    /// Product version ID in the format `v-{7-char-hash}`
    VersionId,
    "version",
    "v"
);

entity_id!(
    /// Milestone ID in the format `m-{7-char-hash}`
    MilestoneId,
    "milestone",
    "m"
);

entity_id!(
    /// Dependency (edge) ID in the format `d-{7-char-hash}`
    DependencyId,
    "dependency",
    "d"
);

entity_id!(
    /// User ID in the format `u-{7-char-hash}`
    UserId,
    "user",
    "u"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_generation_is_unique_for_different_timestamps() {
        let label = "Same Label";
        let ts1 = Utc::now();
        let ts2 = ts1 + chrono::Duration::nanoseconds(1);

        let id1 = MilestoneId::new(label, ts1);
        let id2 = MilestoneId::new(label, ts2);

        assert_ne!(id1, id2);
    }

    #[test]
    fn id_format_is_correct() {
        let id = MilestoneId::new("Beta", Utc::now());
        let s = id.to_string();

        assert!(s.starts_with("m-"));
        assert_eq!(s.len(), 9); // "m-" + 7 chars
    }

    #[test]
    fn id_parses_correctly() {
        let original = ProductId::new("Gadget", Utc::now());
        let s = original.to_string();
        let parsed: ProductId = s.parse().unwrap();

        assert_eq!(original, parsed);
    }

    #[test]
    fn id_rejects_invalid_format() {
        assert!("invalid".parse::<MilestoneId>().is_err());
        assert!("m-short".parse::<MilestoneId>().is_err());
        assert!("m-toolonggg".parse::<MilestoneId>().is_err());
        assert!("m-gggggg1".parse::<MilestoneId>().is_err()); // 'g' is not hex
    }

    #[test]
    fn id_rejects_wrong_prefix() {
        let milestone = MilestoneId::new("Beta", Utc::now());
        let s = milestone.to_string();

        assert!(s.parse::<ProductId>().is_err());
        assert!(s.parse::<DependencyId>().is_err());
    }

    #[test]
    fn id_parse_trims_whitespace() {
        let original = UserId::new("alice", Utc::now());
        let padded = format!("  {}  ", original);
        let parsed: UserId = padded.parse().unwrap();

        assert_eq!(original, parsed);
    }

    #[test]
    fn serde_roundtrip() {
        let original = DependencyId::new("edge", Utc::now());
        let json = serde_json::to_string(&original).unwrap();
        let parsed: DependencyId = serde_json::from_str(&json).unwrap();

        assert_eq!(original, parsed);
    }

    #[test]
    fn serde_rejects_invalid_string() {
        let result: Result<VersionId, _> = serde_json::from_str("\"not-an-id\"");
        assert!(result.is_err());
    }
}

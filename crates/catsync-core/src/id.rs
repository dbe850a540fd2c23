//! Entity identifiers.
//!
//! A [`Guid`] is opaque to catsync: the target metadata store assigns the
//! canonical value once an entity is first persisted. Snapshots built before
//! that point carry placeholder guids of the form `-N`, which the store
//! recognizes as unassigned and replaces. Placeholders are issued by a
//! [`GuidSequence`], so the same input always yields the same placeholders.
//!
//! # Example
//!
//! ```rust
//! use catsync_core::id::{Guid, GuidSequence};
//!
//! let mut guids = GuidSequence::new();
//! let first = guids.next_guid();
//! let parsed: Guid = "a1b2c3d4-0000-0000-0000-000000000000".parse().unwrap();
//!
//! assert_eq!(first.as_str(), "-1");
//! assert!(first.is_placeholder());
//! assert!(!parsed.is_placeholder());
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

const PLACEHOLDER_PREFIX: char = '-';

/// Opaque identifier of an entity in the target metadata store.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Guid(String);

impl Guid {
    /// Returns the placeholder guid `-{n}`.
    #[must_use]
    pub fn placeholder(n: u64) -> Self {
        Self(format!("{PLACEHOLDER_PREFIX}{n}"))
    }

    /// Creates a guid from an existing value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidId`] if the value is empty or only whitespace.
    pub fn new(value: impl Into<String>) -> Result<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(Error::InvalidId {
                message: "guid must be non-empty".to_string(),
            });
        }
        Ok(Self(value))
    }

    /// Returns true if the store has not assigned this guid yet.
    #[must_use]
    pub fn is_placeholder(&self) -> bool {
        self.0.starts_with(PLACEHOLDER_PREFIX)
    }

    /// Returns the guid as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Issues placeholder guids `-1`, `-2`, ... in order.
///
/// One sequence covers one snapshot; two snapshots built from the same input
/// get the same guids.
#[derive(Debug, Clone, Default)]
pub struct GuidSequence {
    issued: u64,
}

impl GuidSequence {
    /// Creates a sequence starting at `-1`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues the next placeholder guid.
    pub fn next_guid(&mut self) -> Guid {
        self.issued += 1;
        Guid::placeholder(self.issued)
    }
}

impl fmt::Display for Guid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Guid {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl AsRef<str> for Guid {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guid_roundtrip() {
        let id = Guid::new("0b4f3b1e-7c1a-4d8e-9f00-1a2b3c4d5e6f").unwrap();
        let s = id.to_string();
        let parsed: Guid = s.parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn sequence_issues_distinct_placeholders_in_order() {
        let mut guids = GuidSequence::new();
        let issued: Vec<_> = (0..3).map(|_| guids.next_guid()).collect();
        assert_eq!(
            issued,
            vec![Guid::placeholder(1), Guid::placeholder(2), Guid::placeholder(3)]
        );
        assert!(issued.iter().all(Guid::is_placeholder));
    }

    #[test]
    fn fresh_sequences_repeat() {
        let mut a = GuidSequence::new();
        let mut b = GuidSequence::new();
        assert_eq!(a.next_guid(), b.next_guid());
        assert_eq!(a.next_guid(), b.next_guid());
    }

    #[test]
    fn assigned_guids_are_not_placeholders() {
        assert!(!Guid::new("0b4f3b1e-7c1a").unwrap().is_placeholder());
    }

    #[test]
    fn empty_guid_returns_error() {
        let result: Result<Guid> = "   ".parse();
        assert!(matches!(result, Err(Error::InvalidId { .. })));
    }

    #[test]
    fn guid_serializes_as_plain_string() {
        let id = Guid::placeholder(42);
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"-42\"");
    }
}

//! Message identifier assigned by the store

use std::{fmt, num::ParseIntError};

use serde::{Deserialize, Serialize};

/// Store-assigned, monotonic message identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(i64);

impl MessageId {
    /// Wrap a raw row id
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    /// Parse a message ID from a path segment
    pub fn parse(s: &str) -> Result<Self, ParseIntError> {
        Ok(Self(s.parse()?))
    }

    /// Get the raw row id
    pub const fn as_i64(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for MessageId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_decimal() {
        let id = MessageId::parse("42").unwrap();
        assert_eq!(id.as_i64(), 42);
    }

    #[test]
    fn parse_rejects_non_numeric() {
        let err = MessageId::parse("abc").unwrap_err();
        assert_eq!(err.to_string(), "invalid digit found in string");
    }

    #[test]
    fn parse_rejects_empty() {
        assert!(MessageId::parse("").is_err());
    }

    #[test]
    fn display_is_plain_number() {
        assert_eq!(MessageId::new(7).to_string(), "7");
    }

    #[test]
    fn serializes_as_bare_integer() {
        let json = serde_json::to_string(&MessageId::new(9)).unwrap();
        assert_eq!(json, "9");
    }
}

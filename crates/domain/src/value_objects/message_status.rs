//! Message status value object
//!
//! A message starts out `CREATED` and may only move to `DELETED`.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::DomainError;

/// Lifecycle status of a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MessageStatus {
    /// Message is live
    #[default]
    Created,
    /// Message was soft-deleted
    Deleted,
}

impl MessageStatus {
    /// Stored and serialized representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "CREATED",
            Self::Deleted => "DELETED",
        }
    }
}

impl fmt::Display for MessageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for MessageStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CREATED" => Ok(Self::Created),
            "DELETED" => Ok(Self::Deleted),
            other => Err(DomainError::UnknownStatus(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_created() {
        assert_eq!(MessageStatus::default(), MessageStatus::Created);
    }

    #[test]
    fn serde_uses_upper_case() {
        assert_eq!(
            serde_json::to_string(&MessageStatus::Deleted).unwrap(),
            r#""DELETED""#
        );
        let parsed: MessageStatus = serde_json::from_str(r#""CREATED""#).unwrap();
        assert_eq!(parsed, MessageStatus::Created);
    }

    #[test]
    fn from_str_matches_as_str() {
        for status in [MessageStatus::Created, MessageStatus::Deleted] {
            assert_eq!(status.as_str().parse::<MessageStatus>().unwrap(), status);
        }
    }

    #[test]
    fn from_str_rejects_unknown() {
        let err = "ARCHIVED".parse::<MessageStatus>().unwrap_err();
        assert_eq!(err.to_string(), "Unknown message status: ARCHIVED");
    }
}

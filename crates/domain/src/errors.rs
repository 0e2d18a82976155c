//! Domain-level errors

use thiserror::Error;

/// Errors that can occur in the domain layer
#[derive(Debug, Error)]
pub enum DomainError {
    /// A stored status string has no matching variant
    #[error("Unknown message status: {0}")]
    UnknownStatus(String),

    /// A stored timestamp could not be read back
    #[error("Invalid date/time: {0}")]
    InvalidDateTime(String),
}

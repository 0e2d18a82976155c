//! Application-level errors and the failure classifier
//!
//! Store failures never cross the service boundary as-is. They are
//! classified into a closed vocabulary of error codes so the HTTP surface
//! stays stable no matter which store sits behind the port.

use thiserror::Error;

/// Namespace embedded in every error code
pub const ERROR_NAMESPACE: &str = "message-service";

const MESSAGE_NOT_FOUND_CODE: &str = "error.message-service.message-not-found";
const UNEXPECTED_ERROR_CODE: &str = "error.message-service.unexpected-error";

/// Failures reported by the persistence port
#[derive(Debug, Error)]
pub enum StoreError {
    /// No row matched the query
    #[error("no matching row")]
    NotFound,

    /// Any other store failure (connectivity, constraints, decoding)
    #[error("store failure: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl StoreError {
    /// Wrap an arbitrary store failure
    pub fn backend(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Backend(err.into())
    }

    /// Check if this is the store's not-found signal
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound)
    }
}

/// Classification category of a failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The requested message does not exist
    NotFound,
    /// Anything else
    Unexpected,
}

impl ErrorKind {
    /// Stable machine-readable error code
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::NotFound => MESSAGE_NOT_FOUND_CODE,
            Self::Unexpected => UNEXPECTED_ERROR_CODE,
        }
    }

    /// HTTP status code reported to clients
    #[must_use]
    pub const fn http_status(&self) -> u16 {
        match self {
            Self::NotFound => 404,
            Self::Unexpected => 500,
        }
    }
}

/// A classified store failure
///
/// Displays as its error code; the wrapped store error is kept for logging
/// and is never serialized to clients.
#[derive(Debug, Error)]
#[error("{}", .kind.code())]
pub struct MessageError {
    kind: ErrorKind,
    #[source]
    source: StoreError,
}

impl MessageError {
    /// Classify a store failure
    pub fn classify(source: StoreError) -> Self {
        let kind = if source.is_not_found() {
            ErrorKind::NotFound
        } else {
            ErrorKind::Unexpected
        };
        Self { kind, source }
    }

    /// Classification category
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Stable error code, also the HTTP response body
    #[must_use]
    pub const fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// HTTP status code for this failure
    #[must_use]
    pub const fn http_status(&self) -> u16 {
        self.kind.http_status()
    }

    /// The underlying store failure
    #[must_use]
    pub const fn store_error(&self) -> &StoreError {
        &self.source
    }
}

impl From<StoreError> for MessageError {
    fn from(source: StoreError) -> Self {
        Self::classify(source)
    }
}

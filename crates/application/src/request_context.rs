//! Request context for propagating correlation data and request metadata
//!
//! The HTTP middleware builds one `RequestContext` per inbound request and
//! hands it to every service call. It carries:
//!
//! - the correlation id (taken from the `requestid` header or generated)
//! - a `ContextLogger` whose span holds the request's log fields
//! - a snapshot of the headers to forward on outbound calls
//!
//! # Examples
//!
//! ```
//! use application::{PropagationHeaders, RequestContext, RequestMetadata};
//!
//! let metadata = RequestMetadata {
//!     request_id: "abc-123",
//!     operation: "/message/1",
//!     ..RequestMetadata::default()
//! };
//! let ctx = RequestContext::new(&metadata, PropagationHeaders::default());
//!
//! assert_eq!(ctx.request_id(), "abc-123");
//! ```

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use tracing::{Span, error_span, field::Empty};
use uuid::Uuid;

/// Header carrying the correlation id
pub const REQUEST_ID_HEADER: &str = "requestid";

/// Header carrying the caller's user agent
pub const USER_AGENT_HEADER: &str = "User-Agent";

/// Header carrying the caller's address
pub const USER_IP_HEADER: &str = "X-Forwarded-For";

/// Headers snapshotted for propagation to downstream calls
pub const PROPAGATED_HEADERS: [&str; 10] = [
    "x-request-id",
    "x-b3-traceid",
    "x-b3-spanid",
    "x-b3-parentspanid",
    "x-b3-sampled",
    "x-b3-flags",
    "x-ot-span-context",
    USER_AGENT_HEADER,
    USER_IP_HEADER,
    REQUEST_ID_HEADER,
];

/// Structured log field bound to a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LogField {
    RequestId,
    Operation,
    UserAgent,
    UserIp,
}

impl LogField {
    /// Field name as it appears in log output
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::RequestId => "request_id",
            Self::Operation => "operation",
            Self::UserAgent => "user_agent",
            Self::UserIp => "user_ip",
        }
    }
}

/// Log fields attached to a request; empty values are never stored
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogFields(BTreeMap<LogField, String>);

impl LogFields {
    /// Insert a field unless the value is empty
    pub fn insert_non_empty(&mut self, field: LogField, value: &str) {
        if !value.is_empty() {
            self.0.insert(field, value.to_owned());
        }
    }

    #[must_use]
    pub fn get(&self, field: LogField) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (LogField, &str)> {
        self.0.iter().map(|(k, v)| (*k, v.as_str()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Logger bound to a single request
///
/// Events emitted with `parent: logger.span()` (or inside the span) carry
/// every recorded field. The span is created at ERROR level so it stays
/// enabled under any filter that lets an event through.
#[derive(Debug, Clone)]
pub struct ContextLogger {
    span: Span,
    fields: LogFields,
}

impl ContextLogger {
    /// Create a logger whose span records the given fields
    #[must_use]
    pub fn new(fields: LogFields) -> Self {
        let span = error_span!(
            "request",
            request_id = Empty,
            operation = Empty,
            user_agent = Empty,
            user_ip = Empty,
        );
        for (field, value) in fields.iter() {
            span.record(field.as_str(), value);
        }
        Self { span, fields }
    }

    #[must_use]
    pub const fn span(&self) -> &Span {
        &self.span
    }

    #[must_use]
    pub const fn fields(&self) -> &LogFields {
        &self.fields
    }
}

/// Snapshot of the propagated headers, in `PROPAGATED_HEADERS` order
///
/// Every name is recorded; headers missing from the request have an empty value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropagationHeaders(Vec<(&'static str, String)>);

impl PropagationHeaders {
    /// Capture the propagated headers using a lookup function
    pub fn capture(mut lookup: impl FnMut(&str) -> Option<String>) -> Self {
        Self(
            PROPAGATED_HEADERS
                .iter()
                .map(|name| (*name, lookup(name).unwrap_or_default()))
                .collect(),
        )
    }

    /// Look up a header value by case-insensitive name
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.0.iter().map(|(n, v)| (*n, v.as_str()))
    }

    /// Entries with a non-empty value
    pub fn present(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.iter().filter(|(_, v)| !v.is_empty())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Raw request attributes the context is built from
///
/// Empty strings mean "absent".
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestMetadata<'a> {
    pub request_id: &'a str,
    pub operation: &'a str,
    pub user_agent: &'a str,
    pub user_ip: &'a str,
}

/// Context for a single request
#[derive(Debug, Clone)]
pub struct RequestContext {
    request_id: String,
    logger: ContextLogger,
    headers: PropagationHeaders,
    received_at: DateTime<Utc>,
}

impl RequestContext {
    /// Build the context for an inbound request
    ///
    /// Generates a UUID v4 correlation id when the metadata carries none.
    #[must_use]
    pub fn new(metadata: &RequestMetadata<'_>, headers: PropagationHeaders) -> Self {
        let request_id = if metadata.request_id.is_empty() {
            Uuid::new_v4().to_string()
        } else {
            metadata.request_id.to_owned()
        };

        let mut fields = LogFields::default();
        fields.insert_non_empty(LogField::RequestId, &request_id);
        fields.insert_non_empty(LogField::Operation, metadata.operation);
        fields.insert_non_empty(LogField::UserAgent, metadata.user_agent);
        fields.insert_non_empty(LogField::UserIp, metadata.user_ip);

        Self {
            request_id,
            logger: ContextLogger::new(fields),
            headers,
            received_at: Utc::now(),
        }
    }

    /// Context for work that did not originate from an HTTP request
    #[must_use]
    pub fn detached(operation: &str) -> Self {
        let metadata = RequestMetadata {
            operation,
            ..RequestMetadata::default()
        };
        Self::new(&metadata, PropagationHeaders::capture(|_| None))
    }

    /// Correlation id of this request
    #[must_use]
    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    #[must_use]
    pub const fn logger(&self) -> &ContextLogger {
        &self.logger
    }

    /// Span carrying the request's log fields
    #[must_use]
    pub const fn span(&self) -> &Span {
        self.logger.span()
    }

    #[must_use]
    pub const fn headers(&self) -> &PropagationHeaders {
        &self.headers
    }

    /// When the request was received
    #[must_use]
    pub const fn received_at(&self) -> DateTime<Utc> {
        self.received_at
    }
}

//! Application layer - Use cases and orchestration
//!
//! Contains the message service, the request context it is driven with,
//! the failure classifier, and port definitions. Orchestrates domain objects
//! and infrastructure adapters.

pub mod error;
pub mod ports;
pub mod request_context;
pub mod services;

pub use error::{ERROR_NAMESPACE, ErrorKind, MessageError, StoreError};
pub use ports::*;
pub use request_context::{
    ContextLogger, LogField, LogFields, PROPAGATED_HEADERS, PropagationHeaders, REQUEST_ID_HEADER,
    RequestContext, RequestMetadata, USER_AGENT_HEADER, USER_IP_HEADER,
};
pub use services::*;

//! HTTP middleware components
//!
//! Request context propagation and request body parsing.

pub mod request_context;
pub mod validation;

pub use request_context::{Ctx, RequestContextLayer, RequestContextService, context_from_parts};
pub use validation::JsonBody;

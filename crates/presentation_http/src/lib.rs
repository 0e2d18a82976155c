//! Message service HTTP presentation layer
//!
//! This crate provides the HTTP API for the message resource.

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use middleware::{Ctx, JsonBody, RequestContextLayer};
pub use routes::create_router;
pub use state::AppState;

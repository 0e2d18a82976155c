//! Logging infrastructure
//!
//! Structured console logging through `tracing-subscriber`.

mod logging;

pub use logging::{TelemetryError, build_filter, init_logging};

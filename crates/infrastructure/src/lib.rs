//! Infrastructure layer - Adapters for external systems
//!
//! Implements ports defined in the application layer.
//! Contains the configuration loader, logging setup, the SQLite message
//! store, and the header-propagating HTTP client.

pub mod config;
pub mod http;
pub mod persistence;
pub mod telemetry;

pub use config::{AppConfig, DatabaseConfig, LegacyEnv, LogFormat, LoggingConfig, ServerConfig};
pub use http::{
    PropagatingClientConfig, PropagatingHttpClient, PropagatingRequestBuilder, RequestBuilderExt,
};
pub use persistence::{
    AsyncDatabase, AsyncDatabaseConfig, AsyncDatabaseError, SqliteDatabaseHealth,
    SqliteMessageStore,
};
pub use telemetry::{TelemetryError, init_logging};

//! Persistence module
//!
//! SQLite-based message storage via sqlx.

pub mod async_connection;
pub mod database_health;
pub mod error;
pub mod message_store;

pub use async_connection::{AsyncDatabase, AsyncDatabaseConfig, AsyncDatabaseError};
pub use database_health::SqliteDatabaseHealth;
pub use message_store::SqliteMessageStore;

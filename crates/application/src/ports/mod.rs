//! Port definitions for application layer
//!
//! Ports are interfaces that define how the application interacts with
//! external systems. Adapters in the infrastructure layer implement these ports.

mod database_health_port;
mod message_store;

#[cfg(test)]
pub use database_health_port::MockDatabaseHealthPort;
pub use database_health_port::DatabaseHealthPort;
#[cfg(test)]
pub use message_store::MockMessageStore;
pub use message_store::MessageStore;

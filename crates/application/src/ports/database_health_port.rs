//! Database health check port

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

/// Port for database connectivity checks
///
/// Backs the readiness probe without coupling it to a specific database.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait DatabaseHealthPort: Send + Sync {
    /// Check if the database is available and responding
    ///
    /// Performs a lightweight query (e.g., `SELECT 1`) to verify connectivity.
    async fn is_available(&self) -> bool;
}

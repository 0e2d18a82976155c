//! Application state shared across handlers

use std::sync::Arc;

use application::{MessageService, ports::DatabaseHealthPort};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Message service for the CRUD handlers
    pub message_service: Arc<MessageService>,
    /// Database probe for the readiness endpoint
    pub database_health: Option<Arc<dyn DatabaseHealthPort>>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("message_service", &self.message_service)
            .field("database_health", &self.database_health.is_some())
            .finish()
    }
}

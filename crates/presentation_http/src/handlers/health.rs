//! Health check handlers

use axum::{extract::State, http::StatusCode};
use tracing::warn;

use crate::state::AppState;

/// Liveness check - is the server running?
pub async fn health_check() -> StatusCode {
    StatusCode::OK
}

/// Readiness check - can the server reach its database?
///
/// Without a configured health port the server is always ready.
pub async fn readiness_check(State(state): State<AppState>) -> StatusCode {
    let Some(database) = &state.database_health else {
        return StatusCode::OK;
    };

    if database.is_available().await {
        StatusCode::OK
    } else {
        warn!("Readiness check failed: database unavailable");
        StatusCode::SERVICE_UNAVAILABLE
    }
}

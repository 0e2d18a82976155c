//! Route definitions

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::catch_panic::CatchPanicLayer;

use crate::{handlers, middleware::RequestContextLayer, state::AppState};

/// Create the main router with all routes
///
/// Message routes are mounted under `root_path`; health routes always stay
/// at the top level.
pub fn create_router(state: AppState, root_path: &str) -> Router {
    let messages = Router::new()
        .route("/message", post(handlers::message::create_message))
        .route(
            "/message/{id}",
            get(handlers::message::get_message)
                .put(handlers::message::update_message)
                .delete(handlers::message::delete_message),
        );

    let router = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/readiness", get(handlers::health::readiness_check));

    let router = match normalize_root_path(root_path) {
        Some(prefix) => router.nest(&prefix, messages),
        None => router.merge(messages),
    };

    with_request_layers(router).with_state(state)
}

/// Wrap a router with request context propagation and panic recovery
pub(crate) fn with_request_layers<S>(router: Router<S>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router
        .layer(RequestContextLayer::new())
        .layer(CatchPanicLayer::new())
}

/// `""` and `"/"` mean no prefix; otherwise ensure one leading and no trailing slash
fn normalize_root_path(root_path: &str) -> Option<String> {
    let trimmed = root_path.trim().trim_matches('/');
    if trimmed.is_empty() {
        None
    } else {
        Some(format!("/{trimmed}"))
    }
}

//! Message service HTTP server

use std::{sync::Arc, time::Duration};

use application::{MessageService, ports::MessageStore};
use infrastructure::{
    AppConfig, AsyncDatabase, AsyncDatabaseConfig, SqliteDatabaseHealth, SqliteMessageStore,
    init_logging,
};
use presentation_http::{create_router, state::AppState};
use tokio::{net::TcpListener, signal};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration before logging so the configured level applies
    let (config, load_error) = match AppConfig::load() {
        Ok(config) => (config, None),
        Err(e) => (AppConfig::default(), Some(e)),
    };

    init_logging(&config.logging)?;

    if let Some(e) = load_error {
        warn!("Failed to load config, using defaults: {}", e);
    }

    info!("message-server v{} starting...", env!("CARGO_PKG_VERSION"));
    info!(
        host = %config.server.host,
        port = %config.server.port,
        root_path = %config.server.root_path,
        "Configuration loaded"
    );

    // Database
    let database = AsyncDatabase::new(&AsyncDatabaseConfig::from(&config.database)).await?;
    if config.database.run_migrations {
        database.migrate().await?;
    }

    let store: Arc<dyn MessageStore> = Arc::new(SqliteMessageStore::new(database.pool().clone()));
    let state = AppState {
        message_service: Arc::new(MessageService::new(store)),
        database_health: Some(Arc::new(SqliteDatabaseHealth::new(
            database.pool().clone(),
        ))),
    };

    let app = create_router(state, &config.server.root_path).layer(TraceLayer::new_for_http());

    // Start server
    let addr = config.server.bind_addr();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server listening on http://{}", addr);

    let shutdown_timeout = Duration::from_secs(config.server.shutdown_timeout_secs.unwrap_or(30));

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown_timeout))
        .await?;

    database.close().await;
    info!("Server shutdown complete");

    Ok(())
}

async fn shutdown_signal(timeout: Duration) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            },
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown...");
        }
        () = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown...");
        }
    }

    info!("Waiting up to {:?} for connections to close...", timeout);
}

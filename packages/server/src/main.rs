use std::sync::Arc;

use anyhow::Context;
use common::storage::FilesystemStore;
use tracing::info;
use tracing_subscriber::EnvFilter;

use school_server::config::AppConfig;
use school_server::database::init_db;
use school_server::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load().context("Failed to load configuration")?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log.filter)),
        )
        .init();

    let db = init_db(&config.database)
        .await
        .context("Failed to initialize database")?;

    let avatar_store = FilesystemStore::new(
        &config.storage.avatars_dir,
        config.storage.max_avatar_size,
    )
    .await
    .context("Failed to prepare avatar directory")?;
    info!(dir = %config.storage.avatars_dir.display(), "Avatar store ready");

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState {
        db,
        config,
        avatar_store: Arc::new(avatar_store),
    };
    let app = school_server::build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Server running at http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

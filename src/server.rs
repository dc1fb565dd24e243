use anyhow::Context;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::app::app;
use crate::auth::SigningKeys;
use crate::config::AppConfig;
use crate::database::DatabaseManager;
use crate::state::AppState;

/// Load signing keys and open the store
pub async fn build_state(config: &AppConfig) -> anyhow::Result<AppState> {
    let keys = SigningKeys::from_config(&config.auth)
        .await
        .context("failed to load token signing keys")?;
    info!("Loaded {} token signing key(s)", keys.len());

    let store = DatabaseManager::open_store(&config.database)
        .await
        .context("failed to open catalogue store")?;

    Ok(AppState::new(store, keys))
}

/// Run the HTTP server until Ctrl-C. `port` overrides the configured port.
pub async fn serve(config: &AppConfig, port: Option<u16>) -> anyhow::Result<()> {
    let state = build_state(config).await?;
    let app = app(state, config);

    let bind_addr = format!("{}:{}", config.api.host, port.unwrap_or(config.api.port));
    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    info!("Games catalogue API listening on http://{}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => {
            warn!("Unable to listen for shutdown signal: {}", e);
            std::future::pending::<()>().await;
        }
    }
}

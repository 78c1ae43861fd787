//! Lylas POS server entry point.
//!
//! Startup order: tracing, config, database (migrations run here),
//! router, listener. Shutdown drains in-flight requests on SIGINT and
//! closes the pool.

use std::sync::Arc;

use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use lylas_db::{Database, DbConfig};
use server::{create_app, AppState, Config};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    info!(addr = %config.bind_addr(), db = %config.database_path, "Starting Lylas POS server");

    let db = Database::new(DbConfig::new(&config.database_path)).await?;
    let state = Arc::new(AppState { db: db.clone() });

    let app = create_app(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
    info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db.close().await;
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("failed to install Ctrl+C handler");
    info!("Shutdown signal received");
}

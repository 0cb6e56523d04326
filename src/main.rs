//! estately server binary
//!
//! Loads configuration (optional `ESTATELY_CONFIG` YAML path), wires the
//! in-memory stores behind the router, and serves.

use std::sync::Arc;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use estately::config::ServerConfig;
use estately::core::auth::TokenRegistry;
use estately::server::{AppState, build_router};
use estately::store::{InMemoryPropertyStore, InMemoryScheduleStore};
use estately::upload::LocalFileStore;

#[tokio::main]
async fn main() -> Result<()> {
    let config = match std::env::var("ESTATELY_CONFIG") {
        Ok(path) => ServerConfig::from_yaml_file(&path)?,
        Err(_) => ServerConfig::default(),
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_filter)),
        )
        .init();

    let state = AppState {
        properties: Arc::new(InMemoryPropertyStore::new()),
        schedules: Arc::new(InMemoryScheduleStore::new()),
        files: Arc::new(LocalFileStore::new(&config.upload_dir)),
        auth: Arc::new(TokenRegistry::new()),
    };

    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
    tracing::info!("estately listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}

//! ossbridge API Server
//!
//! Main entry point for the object storage façade service.

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ossbridge_api::{AppState, create_router};
use ossbridge_core::storage::{ObjectStorageService, StorageConfig};
use ossbridge_shared::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ossbridge=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load()?;

    let storage_config = StorageConfig::from_settings(&config.storage)?;
    let storage = ObjectStorageService::from_config(storage_config)?;
    info!(
        provider = storage.provider_name(),
        bucket = %storage.config().bucket_name,
        download_endpoint = %storage.config().download_endpoint,
        "Object storage configured"
    );

    let state = AppState {
        storage: Arc::new(storage),
    };
    let app = create_router(state, config.server.body_limit_bytes);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

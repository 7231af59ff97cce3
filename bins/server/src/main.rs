//! Filedrop API Server
//!
//! Main entry point for the upload service.

use std::sync::Arc;

use sea_orm_migration::MigratorTrait;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use filedrop_api::{AppState, create_router};
use filedrop_core::metadata::{InMemoryMetadataStore, MetadataStore};
use filedrop_core::storage::{StorageConfig, StorageService};
use filedrop_core::upload::{UploadService, UploadSettings};
use filedrop_db::{UploadRecordRepository, connect, migration::Migrator};
use filedrop_shared::{AppConfig, MetadataConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    init_tracing();

    let config = AppConfig::load()?;

    // Blob store
    let storage = StorageService::from_config(StorageConfig::from(config.storage.clone()))?;
    info!(
        provider = storage.provider_name(),
        bucket = %storage.bucket(),
        "Storage service configured"
    );

    // Metadata store
    let metadata = metadata_store(&config.metadata).await?;

    let settings = UploadSettings::new(storage.bucket(), config.metadata.table.clone())
        .with_policy(config.upload);
    let uploads = UploadService::new(Arc::new(storage), metadata, settings);

    let state = AppState {
        uploads: Arc::new(uploads),
    };
    let app = create_router(state, &config.server, &config.cors);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

/// Install the global subscriber. `FILEDROP_LOG_FORMAT=json` switches to JSON lines.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "filedrop=debug,tower_http=debug".into());
    let json = std::env::var("FILEDROP_LOG_FORMAT").is_ok_and(|format| format == "json");

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

/// Connect the SQL metadata store, or fall back to memory when no URL is set.
async fn metadata_store(config: &MetadataConfig) -> anyhow::Result<Arc<dyn MetadataStore>> {
    if config.database_url.is_none() {
        warn!("metadata.database_url is not set, upload records are kept in memory");
        return Ok(Arc::new(InMemoryMetadataStore::new()));
    }

    let db = connect(config).await?;
    info!(table = %config.table, "Connected to database");

    if config.run_migrations {
        Migrator::up(&db, None).await?;
        info!("Migrations applied");
    }

    Ok(Arc::new(UploadRecordRepository::new(db)))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

//! Database layer with `SeaORM` entities and repositories.
//!
//! This crate provides:
//! - `SeaORM` entity definitions
//! - The SQL-backed metadata store
//! - Database migrations

pub mod entities;
pub mod migration;
pub mod repositories;

pub use repositories::UploadRecordRepository;

use std::time::Duration;

use filedrop_shared::MetadataConfig;
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};

/// Establishes a pooled connection using the metadata store settings.
///
/// # Errors
///
/// Returns an error if no database URL is configured or the connection
/// cannot be established.
pub async fn connect(config: &MetadataConfig) -> Result<DatabaseConnection, DbErr> {
    let url = config
        .database_url
        .as_deref()
        .ok_or_else(|| DbErr::Custom("metadata.database_url is not set".to_string()))?;

    let mut options = ConnectOptions::new(url);
    options
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .connect_timeout(Duration::from_secs(10))
        .sqlx_logging(false);

    Database::connect(options).await
}

//! Upload record repository for database operations.
//!
//! Implements the metadata store over any table shaped like `UserUploads`.
//! The table is chosen per call, so statements are built with `sea_query`
//! rather than through the entity's fixed table name.

use async_trait::async_trait;
use sea_orm::sea_query::{Alias, Expr, OnConflict, Query};
use sea_orm::{ConnectionTrait, DatabaseConnection, DbErr};
use tracing::debug;

use crate::entities::user_uploads::Column;
use filedrop_core::metadata::{MetadataStore, MetadataStoreError};
use filedrop_core::upload::UploadRecord;

/// Upload record repository implementation.
#[derive(Debug, Clone)]
pub struct UploadRecordRepository {
    db: DatabaseConnection,
}

impl UploadRecordRepository {
    /// Create a new upload record repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl MetadataStore for UploadRecordRepository {
    async fn put(&self, table: &str, record: &UploadRecord) -> Result<(), MetadataStoreError> {
        let stmt = Query::insert()
            .into_table(Alias::new(table))
            .columns([Column::Email, Column::Name, Column::FileUrl])
            .values([
                record.email.clone().into(),
                record.name.clone().into(),
                record.file_url.clone().into(),
            ])
            .map_err(|e| MetadataStoreError::database(e.to_string()))?
            .on_conflict(
                OnConflict::column(Column::Email)
                    .update_columns([Column::Name, Column::FileUrl])
                    .value(Column::UpdatedAt, Expr::current_timestamp())
                    .to_owned(),
            )
            .to_owned();

        let backend = self.db.get_database_backend();
        self.db
            .execute(backend.build(&stmt))
            .await
            .map_err(db_error)?;

        debug!(table = %table, email = %record.email, "Upload record written");
        Ok(())
    }

    async fn get(
        &self,
        table: &str,
        email: &str,
    ) -> Result<Option<UploadRecord>, MetadataStoreError> {
        let stmt = Query::select()
            .columns([Column::Email, Column::Name, Column::FileUrl])
            .from(Alias::new(table))
            .and_where(Expr::col(Column::Email).eq(email))
            .to_owned();

        let backend = self.db.get_database_backend();
        let Some(row) = self
            .db
            .query_one(backend.build(&stmt))
            .await
            .map_err(db_error)?
        else {
            return Ok(None);
        };

        let read = |column: &str| -> Result<String, MetadataStoreError> {
            row.try_get::<String>("", column)
                .map_err(|e| MetadataStoreError::malformed_record(table, e.to_string()))
        };

        Ok(Some(UploadRecord {
            email: read("email")?,
            name: read("name")?,
            file_url: read("file_url")?,
        }))
    }
}

fn db_error(err: DbErr) -> MetadataStoreError {
    match err {
        DbErr::Conn(_) | DbErr::ConnectionAcquire(_) => {
            MetadataStoreError::unavailable(err.to_string())
        }
        _ => MetadataStoreError::database(err.to_string()),
    }
}

//! Metadata store contract.

use async_trait::async_trait;

use super::error::MetadataStoreError;
use crate::upload::UploadRecord;

/// Structured store that keeps one record per uploader email.
///
/// Implemented by the db crate for SQL databases and by
/// [`InMemoryMetadataStore`](super::InMemoryMetadataStore) for local runs.
#[async_trait]
pub trait MetadataStore: Send + Sync {
    /// Insert `record` into `table`, replacing any record with the same email.
    async fn put(&self, table: &str, record: &UploadRecord) -> Result<(), MetadataStoreError>;

    /// Find the record stored for `email` in `table`.
    async fn get(
        &self,
        table: &str,
        email: &str,
    ) -> Result<Option<UploadRecord>, MetadataStoreError>;
}

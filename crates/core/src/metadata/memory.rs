//! In-memory metadata store.

use async_trait::async_trait;
use dashmap::DashMap;

use super::error::MetadataStoreError;
use super::store::MetadataStore;
use crate::upload::UploadRecord;

/// Metadata store kept in process memory, keyed by `(table, email)`.
///
/// Used when no database is configured; records are lost on restart.
#[derive(Debug, Default)]
pub struct InMemoryMetadataStore {
    records: DashMap<(String, String), UploadRecord>,
}

impl InMemoryMetadataStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All records in `table`, in no particular order.
    #[must_use]
    pub fn records(&self, table: &str) -> Vec<UploadRecord> {
        self.records
            .iter()
            .filter(|entry| entry.key().0 == table)
            .map(|entry| entry.value().clone())
            .collect()
    }

    /// Total number of records across all tables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the store holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl MetadataStore for InMemoryMetadataStore {
    async fn put(&self, table: &str, record: &UploadRecord) -> Result<(), MetadataStoreError> {
        self.records
            .insert((table.to_string(), record.email.clone()), record.clone());
        Ok(())
    }

    async fn get(
        &self,
        table: &str,
        email: &str,
    ) -> Result<Option<UploadRecord>, MetadataStoreError> {
        Ok(self
            .records
            .get(&(table.to_string(), email.to_string()))
            .map(|entry| entry.value().clone()))
    }
}

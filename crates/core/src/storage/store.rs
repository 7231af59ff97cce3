//! Blob store contract.

use async_trait::async_trait;
use bytes::Bytes;

use super::error::BlobStoreError;

/// Object storage used for uploaded files.
///
/// Writes to an existing key replace the stored object.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store `bytes` under `key` and return the object's public location.
    async fn upload(
        &self,
        bucket: &str,
        key: &str,
        bytes: Bytes,
        content_type: &str,
    ) -> Result<String, BlobStoreError>;

    /// Remove the object stored under `key`.
    async fn delete(&self, bucket: &str, key: &str) -> Result<(), BlobStoreError>;

    /// Read back the object stored under `key`.
    async fn read(&self, bucket: &str, key: &str) -> Result<Bytes, BlobStoreError>;
}

//! Blob store implementation using Apache OpenDAL.

use async_trait::async_trait;
use bytes::Bytes;
use filedrop_shared::StorageProvider;
use opendal::{Builder, ErrorKind, Operator, services};

use super::config::{StorageConfig, parse_base_url};
use super::error::BlobStoreError;
use super::store::BlobStore;

/// OpenDAL-backed blob store bound to a single bucket.
#[derive(Debug, Clone)]
pub struct StorageService {
    operator: Operator,
    config: StorageConfig,
}

impl StorageService {
    /// Create a new storage service from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage provider cannot be initialized or the
    /// public base URL is not absolute.
    pub fn from_config(config: StorageConfig) -> Result<Self, BlobStoreError> {
        parse_base_url(&config.public_base_url)?;
        let operator = Self::create_operator(&config.provider, &config.bucket)?;
        Ok(Self { operator, config })
    }

    /// Create OpenDAL operator from provider config.
    fn create_operator(
        provider: &StorageProvider,
        bucket: &str,
    ) -> Result<Operator, BlobStoreError> {
        match provider {
            StorageProvider::S3 {
                endpoint,
                access_key_id,
                secret_access_key,
                region,
            } => finish(
                services::S3::default()
                    .endpoint(endpoint)
                    .bucket(bucket)
                    .access_key_id(access_key_id)
                    .secret_access_key(secret_access_key)
                    .region(region),
            ),
            StorageProvider::AzureBlob {
                account,
                access_key,
            } => finish(
                services::Azblob::default()
                    .account_name(account)
                    .account_key(access_key)
                    .container(bucket),
            ),
            StorageProvider::LocalFs { root } => {
                let root = root.join(bucket);
                let root = root
                    .to_str()
                    .ok_or_else(|| BlobStoreError::configuration("invalid path"))?;
                finish(services::Fs::default().root(root))
            }
            StorageProvider::Memory => finish(services::Memory::default()),
        }
    }

    /// Reject calls addressed to a bucket this operator is not bound to.
    fn ensure_bucket(&self, bucket: &str) -> Result<(), BlobStoreError> {
        if bucket == self.config.bucket {
            Ok(())
        } else {
            Err(BlobStoreError::unknown_bucket(bucket))
        }
    }

    /// Get the storage provider name.
    #[must_use]
    pub fn provider_name(&self) -> &'static str {
        self.config.provider.name()
    }

    /// Get the bucket/container name.
    #[must_use]
    pub fn bucket(&self) -> &str {
        &self.config.bucket
    }
}

#[async_trait]
impl BlobStore for StorageService {
    async fn upload(
        &self,
        bucket: &str,
        key: &str,
        bytes: Bytes,
        content_type: &str,
    ) -> Result<String, BlobStoreError> {
        self.ensure_bucket(bucket)?;

        // Fs and memory backends cannot persist a content type.
        if self
            .operator
            .info()
            .full_capability()
            .write_with_content_type
        {
            self.operator
                .write_with(key, bytes)
                .content_type(content_type)
                .await?;
        } else {
            self.operator.write(key, bytes).await?;
        }

        self.config.location(key)
    }

    async fn delete(&self, bucket: &str, key: &str) -> Result<(), BlobStoreError> {
        self.ensure_bucket(bucket)?;
        self.operator.delete(key).await.map_err(BlobStoreError::from)
    }

    async fn read(&self, bucket: &str, key: &str) -> Result<Bytes, BlobStoreError> {
        self.ensure_bucket(bucket)?;
        match self.operator.read(key).await {
            Ok(buffer) => Ok(buffer.to_bytes()),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(BlobStoreError::not_found(key)),
            Err(e) => Err(e.into()),
        }
    }
}

fn finish(builder: impl Builder) -> Result<Operator, BlobStoreError> {
    Ok(Operator::new(builder)
        .map_err(|e| BlobStoreError::configuration(e.to_string()))?
        .finish())
}

//! Storage configuration types.

use filedrop_shared::{StorageProvider, StorageSettings};
use url::Url;

use super::error::BlobStoreError;

/// Blob storage service configuration.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Storage provider configuration.
    pub provider: StorageProvider,
    /// Bucket (or container) the service writes to.
    pub bucket: String,
    /// Public URL prefix for stored keys.
    pub public_base_url: String,
}

impl StorageConfig {
    /// Create a new storage config.
    #[must_use]
    pub fn new(
        provider: StorageProvider,
        bucket: impl Into<String>,
        public_base_url: impl Into<String>,
    ) -> Self {
        Self {
            provider,
            bucket: bucket.into(),
            public_base_url: public_base_url.into(),
        }
    }

    /// In-memory storage, for tests and local runs.
    #[must_use]
    pub fn memory(bucket: impl Into<String>, public_base_url: impl Into<String>) -> Self {
        Self::new(StorageProvider::Memory, bucket, public_base_url)
    }

    /// Public location of an object stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if `public_base_url` is not an absolute base URL.
    pub fn location(&self, key: &str) -> Result<String, BlobStoreError> {
        public_location(&self.public_base_url, key)
    }
}

/// Join `key` onto `base_url`, percent-encoding each `/`-separated segment.
///
/// # Errors
///
/// Returns an error if `base_url` is not an absolute base URL.
pub fn public_location(base_url: &str, key: &str) -> Result<String, BlobStoreError> {
    let mut url = parse_base_url(base_url)?;
    url.path_segments_mut()
        .map_err(|()| BlobStoreError::configuration(format!("cannot be a base URL: {base_url}")))?
        .pop_if_empty()
        .extend(key.split('/'));
    Ok(url.into())
}

/// Parse and check the public base URL.
pub(crate) fn parse_base_url(base_url: &str) -> Result<Url, BlobStoreError> {
    let url = Url::parse(base_url).map_err(|e| {
        BlobStoreError::configuration(format!("invalid public base URL {base_url}: {e}"))
    })?;
    if url.cannot_be_a_base() {
        return Err(BlobStoreError::configuration(format!(
            "cannot be a base URL: {base_url}"
        )));
    }
    Ok(url)
}

impl From<StorageSettings> for StorageConfig {
    fn from(settings: StorageSettings) -> Self {
        Self::new(settings.provider, settings.bucket, settings.public_base_url)
    }
}

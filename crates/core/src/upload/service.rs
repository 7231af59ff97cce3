//! Upload orchestration.

use std::sync::Arc;

use filedrop_shared::{KeyStrategy, OrphanPolicy, UploadPolicyConfig};

use super::error::UploadError;
use super::key::derive_key;
use super::observer::{TracingObserver, UploadEvent, UploadObserver, UploadStage};
use super::types::{DecodedUpload, UploadRecord, UploadResult};
use super::validation::validate;
use crate::metadata::{MetadataStore, MetadataStoreError};
use crate::storage::BlobStore;

/// Where uploads go and how failures are handled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadSettings {
    /// Blob store bucket.
    pub bucket: String,
    /// Metadata store table.
    pub table: String,
    /// Blob key derivation.
    pub key_strategy: KeyStrategy,
    /// Handling of blobs left without a record.
    pub orphan_policy: OrphanPolicy,
}

impl UploadSettings {
    /// Settings with default policy for `bucket` and `table`.
    #[must_use]
    pub fn new(bucket: impl Into<String>, table: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            table: table.into(),
            key_strategy: KeyStrategy::default(),
            orphan_policy: OrphanPolicy::default(),
        }
    }

    /// Apply a configured upload policy.
    #[must_use]
    pub fn with_policy(mut self, policy: UploadPolicyConfig) -> Self {
        self.key_strategy = policy.key_strategy;
        self.orphan_policy = policy.orphan_policy;
        self
    }

    /// Set key strategy.
    #[must_use]
    pub fn with_key_strategy(mut self, strategy: KeyStrategy) -> Self {
        self.key_strategy = strategy;
        self
    }

    /// Set orphan policy.
    #[must_use]
    pub fn with_orphan_policy(mut self, policy: OrphanPolicy) -> Self {
        self.orphan_policy = policy;
        self
    }
}

/// Coordinates the blob write and the metadata write for an upload.
///
/// The two writes are not transactional. The blob is written first; if the
/// metadata write then fails the blob remains unless
/// [`OrphanPolicy::Delete`] is configured.
#[derive(Clone)]
pub struct UploadService {
    blobs: Arc<dyn BlobStore>,
    metadata: Arc<dyn MetadataStore>,
    observer: Arc<dyn UploadObserver>,
    settings: UploadSettings,
}

impl UploadService {
    /// Create a new upload service that reports to `tracing`.
    #[must_use]
    pub fn new(
        blobs: Arc<dyn BlobStore>,
        metadata: Arc<dyn MetadataStore>,
        settings: UploadSettings,
    ) -> Self {
        Self {
            blobs,
            metadata,
            observer: Arc::new(TracingObserver),
            settings,
        }
    }

    /// Replace the observer.
    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn UploadObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Get the settings.
    #[must_use]
    pub fn settings(&self) -> &UploadSettings {
        &self.settings
    }

    /// Report a body that could not be decoded and return the error for it.
    pub fn reject_malformed(&self, detail: impl Into<String>) -> UploadError {
        let err = UploadError::decode(detail);
        self.observer.observe(&UploadEvent::Rejected {
            stage: UploadStage::Decoding,
            reason: err.to_string(),
        });
        err
    }

    /// Validate the form, store the file, then record its metadata.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `name`, `email` or `file` is missing (no store is called)
    /// - The blob store fails (no metadata is written)
    /// - The metadata store fails (the blob has already been written)
    pub async fn upload(&self, decoded: DecodedUpload) -> Result<UploadResult, UploadError> {
        let request = validate(decoded).inspect_err(|err| {
            self.observer.observe(&UploadEvent::Rejected {
                stage: UploadStage::Validating,
                reason: err.to_string(),
            });
        })?;

        let bucket = self.settings.bucket.as_str();
        let key = derive_key(self.settings.key_strategy, &request.file.filename);

        let file_url = match self
            .blobs
            .upload(
                bucket,
                &key,
                request.file.bytes,
                &request.file.content_type,
            )
            .await
        {
            Ok(location) => location,
            Err(err) => return Err(self.failed(&key, err.into())),
        };

        let record = UploadRecord {
            email: request.email,
            name: request.name,
            file_url,
        };

        if let Err(err) = self.metadata.put(&self.settings.table, &record).await {
            return Err(self.metadata_failed(&key, err).await);
        }

        self.observer.observe(&UploadEvent::Stored {
            bucket: bucket.to_string(),
            key,
            file_url: record.file_url.clone(),
            email: record.email,
        });

        Ok(UploadResult::stored(record.file_url))
    }

    /// Handle a metadata failure for a blob already stored under `key`.
    async fn metadata_failed(&self, key: &str, err: MetadataStoreError) -> UploadError {
        let bucket = self.settings.bucket.as_str();

        let err = match self.settings.orphan_policy {
            OrphanPolicy::Keep => {
                self.observer.observe(&UploadEvent::OrphanLeft {
                    bucket: bucket.to_string(),
                    key: key.to_string(),
                });
                UploadError::from(err)
            }
            OrphanPolicy::Delete => match self.blobs.delete(bucket, key).await {
                Ok(()) => {
                    self.observer.observe(&UploadEvent::OrphanRemoved {
                        bucket: bucket.to_string(),
                        key: key.to_string(),
                    });
                    UploadError::from(err)
                }
                Err(cleanup) => {
                    self.observer.observe(&UploadEvent::OrphanLeft {
                        bucket: bucket.to_string(),
                        key: key.to_string(),
                    });
                    UploadError::CleanupFailed {
                        metadata: err,
                        cleanup,
                    }
                }
            },
        };

        self.failed(key, err)
    }

    fn failed(&self, key: &str, err: UploadError) -> UploadError {
        self.observer.observe(&UploadEvent::Failed {
            stage: err.stage(),
            bucket: self.settings.bucket.clone(),
            key: key.to_string(),
            error: err.to_string(),
        });
        err
    }
}

impl std::fmt::Debug for UploadService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadService")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

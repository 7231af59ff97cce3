//! Blob store error types.

use thiserror::Error;

/// Blob store operation errors.
#[derive(Debug, Error)]
pub enum BlobStoreError {
    /// Object not found in storage.
    #[error("object not found: {key}")]
    NotFound {
        /// Storage key that was not found.
        key: String,
    },

    /// The store is not configured for the requested bucket.
    #[error("unknown bucket: {bucket}")]
    UnknownBucket {
        /// Requested bucket.
        bucket: String,
    },

    /// Credentials rejected by the provider.
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    /// Storage provider configuration error.
    #[error("storage configuration error: {0}")]
    Configuration(String),

    /// OpenDAL operation error.
    #[error("storage operation failed: {0}")]
    Operation(String),
}

impl BlobStoreError {
    /// Create a not found error.
    #[must_use]
    pub fn not_found(key: impl Into<String>) -> Self {
        Self::NotFound { key: key.into() }
    }

    /// Create an unknown bucket error.
    #[must_use]
    pub fn unknown_bucket(bucket: impl Into<String>) -> Self {
        Self::UnknownBucket {
            bucket: bucket.into(),
        }
    }

    /// Create a configuration error.
    #[must_use]
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Create an operation error.
    #[must_use]
    pub fn operation(msg: impl Into<String>) -> Self {
        Self::Operation(msg.into())
    }
}

impl From<opendal::Error> for BlobStoreError {
    fn from(err: opendal::Error) -> Self {
        match err.kind() {
            opendal::ErrorKind::NotFound => Self::NotFound {
                key: err.to_string(),
            },
            opendal::ErrorKind::PermissionDenied => Self::PermissionDenied(err.to_string()),
            opendal::ErrorKind::ConfigInvalid => Self::Configuration(err.to_string()),
            _ => Self::Operation(err.to_string()),
        }
    }
}

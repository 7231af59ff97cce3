//! Upload error types.

use thiserror::Error;

use super::observer::UploadStage;
use crate::metadata::MetadataStoreError;
use crate::storage::BlobStoreError;

/// Message returned for malformed multipart bodies.
pub const MALFORMED_REQUEST_MESSAGE: &str = "Invalid multipart request";
/// Message returned when required fields are absent.
pub const MISSING_FIELDS_MESSAGE: &str = "Missing fields";
/// Message returned for every dependency failure.
pub const UPLOAD_FAILED_MESSAGE: &str = "Upload failed";

/// Upload workflow errors.
#[derive(Debug, Error)]
pub enum UploadError {
    /// The request body could not be decoded.
    #[error("malformed multipart body: {0}")]
    Decode(String),

    /// One or more required values are absent or empty.
    #[error("missing required fields: {}", .fields.join(", "))]
    MissingFields {
        /// Names of the missing fields.
        fields: Vec<&'static str>,
    },

    /// The blob store rejected the upload.
    #[error("blob upload failed: {0}")]
    BlobStore(#[from] BlobStoreError),

    /// The metadata write failed after the blob was stored.
    #[error("metadata write failed: {0}")]
    MetadataStore(#[from] MetadataStoreError),

    /// The metadata write failed and removing the stored blob failed too.
    #[error("metadata write failed: {metadata}; orphan cleanup failed: {cleanup}")]
    CleanupFailed {
        /// The metadata failure.
        metadata: MetadataStoreError,
        /// The failed compensating delete.
        cleanup: BlobStoreError,
    },
}

impl UploadError {
    /// Create a decode error.
    #[must_use]
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Create a missing fields error.
    #[must_use]
    pub fn missing_fields(fields: Vec<&'static str>) -> Self {
        Self::MissingFields { fields }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Decode(_) | Self::MissingFields { .. } => 400,
            Self::BlobStore(_) | Self::MetadataStore(_) | Self::CleanupFailed { .. } => 500,
        }
    }

    /// Returns the message shown to the caller.
    ///
    /// Dependency failures all collapse to the same message.
    #[must_use]
    pub const fn public_message(&self) -> &'static str {
        match self {
            Self::Decode(_) => MALFORMED_REQUEST_MESSAGE,
            Self::MissingFields { .. } => MISSING_FIELDS_MESSAGE,
            Self::BlobStore(_) | Self::MetadataStore(_) | Self::CleanupFailed { .. } => {
                UPLOAD_FAILED_MESSAGE
            }
        }
    }

    /// Returns the workflow stage that produced this error.
    #[must_use]
    pub const fn stage(&self) -> UploadStage {
        match self {
            Self::Decode(_) => UploadStage::Decoding,
            Self::MissingFields { .. } => UploadStage::Validating,
            Self::BlobStore(_) => UploadStage::BlobUpload,
            Self::MetadataStore(_) | Self::CleanupFailed { .. } => UploadStage::MetadataWrite,
        }
    }
}

//! Upload types and data structures.

use std::collections::HashMap;

use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// Message returned with every successful upload.
pub const UPLOAD_SUCCESS_MESSAGE: &str = "Upload successful";

/// Content type assumed when a file part does not declare one.
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// A file part held fully in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePart {
    /// File contents.
    pub bytes: Bytes,
    /// Original filename as supplied by the caller.
    pub filename: String,
    /// Declared MIME type.
    pub content_type: String,
}

impl FilePart {
    /// Create a file part.
    #[must_use]
    pub fn new(
        bytes: impl Into<Bytes>,
        filename: impl Into<String>,
        content_type: impl Into<String>,
    ) -> Self {
        Self {
            bytes: bytes.into(),
            filename: filename.into(),
            content_type: content_type.into(),
        }
    }
}

/// A decoded multipart form, before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodedUpload {
    /// Text fields by name.
    pub fields: HashMap<String, String>,
    /// The `file` part, if one was sent.
    pub file: Option<FilePart>,
}

impl DecodedUpload {
    /// Create an empty form.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a text field. A repeated name replaces the earlier value.
    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Attach the file part.
    #[must_use]
    pub fn with_file(mut self, file: FilePart) -> Self {
        self.file = Some(file);
        self
    }

    /// Get a text field by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }
}

/// A validated upload request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRequest {
    /// Uploader's display name.
    pub name: String,
    /// Uploader's email, used as the metadata key.
    pub email: String,
    /// The uploaded file. Never empty.
    pub file: FilePart,
}

/// Metadata record written after a successful blob upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadRecord {
    /// Uploader's email.
    pub email: String,
    /// Uploader's display name.
    pub name: String,
    /// Public location of the stored file.
    pub file_url: String,
}

/// Success payload returned to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResult {
    /// Human-readable status.
    pub message: String,
    /// Public location of the stored file.
    pub file_url: String,
}

impl UploadResult {
    /// Successful result for a file stored at `file_url`.
    #[must_use]
    pub fn stored(file_url: impl Into<String>) -> Self {
        Self {
            message: UPLOAD_SUCCESS_MESSAGE.to_string(),
            file_url: file_url.into(),
        }
    }
}

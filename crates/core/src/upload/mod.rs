//! Upload workflow.
//!
//! This module provides the single-file upload pipeline:
//! - Decoded form and request types
//! - Required-field validation
//! - Blob key derivation
//! - Orchestration of the blob write and the metadata write
//! - Outcome reporting through an observer

mod error;
mod key;
mod observer;
mod service;
mod types;
mod validation;

#[cfg(test)]
mod validation_props;

pub use error::{
    MALFORMED_REQUEST_MESSAGE, MISSING_FIELDS_MESSAGE, UPLOAD_FAILED_MESSAGE, UploadError,
};
pub use key::derive_key;
pub use observer::{TracingObserver, UploadEvent, UploadObserver, UploadStage};
pub use service::{UploadService, UploadSettings};
pub use types::{
    DEFAULT_CONTENT_TYPE, DecodedUpload, FilePart, UPLOAD_SUCCESS_MESSAGE, UploadRecord,
    UploadRequest, UploadResult,
};
pub use validation::{EMAIL_FIELD, FILE_FIELD, NAME_FIELD, validate};

//! Multipart upload form extractor.
//!
//! Reads a `multipart/form-data` body into a [`DecodedUpload`], holding the
//! file part fully in memory. A request that is not multipart at all decodes
//! to an empty form and is left to field validation.

use axum::{
    Json,
    extract::{
        FromRequest, Multipart, Request,
        multipart::MultipartError,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use tracing::debug;

use filedrop_core::upload::{
    DEFAULT_CONTENT_TYPE, DecodedUpload, FILE_FIELD, FilePart, MALFORMED_REQUEST_MESSAGE,
};

/// Decoded upload form.
///
/// Text parts become fields (a repeated name keeps the last value). The one
/// part with a filename must be named `file`.
#[derive(Debug)]
pub struct UploadForm(pub DecodedUpload);

/// Reasons a body cannot be decoded as an upload form.
#[derive(Debug, Error)]
pub enum UploadFormRejection {
    /// The multipart stream is malformed, truncated, or over the body limit.
    #[error("failed to read multipart field: {0}")]
    Field(#[from] MultipartError),

    /// A file part arrived under a field other than `file`.
    #[error("unexpected file field: {0}")]
    UnexpectedFile(String),

    /// More than one file part was sent.
    #[error("more than one file part named `file`")]
    DuplicateFile,
}

impl IntoResponse for UploadFormRejection {
    fn into_response(self) -> Response {
        (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": MALFORMED_REQUEST_MESSAGE })),
        )
            .into_response()
    }
}

impl<S> FromRequest<S> for UploadForm
where
    S: Send + Sync,
{
    type Rejection = UploadFormRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let mut multipart = match Multipart::from_request(req, state).await {
            Ok(multipart) => multipart,
            Err(rejection) => {
                debug!(reason = %rejection, "Request is not multipart, decoding as empty form");
                return Ok(Self(DecodedUpload::new()));
            }
        };
        let mut form = DecodedUpload::new();

        while let Some(field) = multipart.next_field().await? {
            let name = field.name().unwrap_or_default().to_string();

            let Some(filename) = field.file_name().map(str::to_owned) else {
                let value = field.text().await?;
                form.fields.insert(name, value);
                continue;
            };

            if name != FILE_FIELD {
                return Err(UploadFormRejection::UnexpectedFile(name));
            }
            if form.file.is_some() {
                return Err(UploadFormRejection::DuplicateFile);
            }

            let content_type = field
                .content_type()
                .unwrap_or(DEFAULT_CONTENT_TYPE)
                .to_string();
            let bytes = field.bytes().await?;

            form.file = Some(FilePart {
                bytes,
                filename,
                content_type,
            });
        }

        Ok(Self(form))
    }
}

//! Upload request validation.

use super::error::UploadError;
use super::types::{DecodedUpload, FilePart, UploadRequest};

/// Form field carrying the uploader's name.
pub const NAME_FIELD: &str = "name";
/// Form field carrying the uploader's email.
pub const EMAIL_FIELD: &str = "email";
/// Form field carrying the file.
pub const FILE_FIELD: &str = "file";

/// Validates a decoded form into an [`UploadRequest`].
///
/// `file`, `email` and `name` must all be present and non-empty. A file
/// with no bytes or no filename counts as absent. Values are not trimmed
/// and the email is not checked for shape.
///
/// # Errors
///
/// Returns [`UploadError::MissingFields`] listing every absent value.
pub fn validate(decoded: DecodedUpload) -> Result<UploadRequest, UploadError> {
    let DecodedUpload { mut fields, file } = decoded;

    let file = file.filter(|f| !f.bytes.is_empty() && !f.filename.is_empty());
    let email = non_empty(fields.remove(EMAIL_FIELD));
    let name = non_empty(fields.remove(NAME_FIELD));

    match (file, email, name) {
        (Some(file), Some(email), Some(name)) => Ok(UploadRequest { name, email, file }),
        (file, email, name) => Err(UploadError::missing_fields(missing(
            file.as_ref(),
            email.as_deref(),
            name.as_deref(),
        ))),
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn missing(
    file: Option<&FilePart>,
    email: Option<&str>,
    name: Option<&str>,
) -> Vec<&'static str> {
    let mut fields = Vec::with_capacity(3);
    if file.is_none() {
        fields.push(FILE_FIELD);
    }
    if email.is_none() {
        fields.push(EMAIL_FIELD);
    }
    if name.is_none() {
        fields.push(NAME_FIELD);
    }
    fields
}

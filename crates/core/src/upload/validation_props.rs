//! Property-based tests for upload validation.

use proptest::prelude::*;

use super::error::UploadError;
use super::types::{DecodedUpload, FilePart};
use super::validation::validate;

/// Strategy for a present-or-absent non-empty text value.
fn maybe_text() -> impl Strategy<Value = Option<String>> {
    prop::option::of(".{1,40}")
}

/// Strategy for a present-or-absent non-empty file.
fn maybe_file() -> impl Strategy<Value = Option<FilePart>> {
    prop::option::of(
        (
            prop::collection::vec(any::<u8>(), 1..256),
            "[a-zA-Z0-9 ._-]{1,30}",
            "[a-z]+/[a-z0-9.+-]+",
        )
            .prop_map(|(bytes, filename, content_type)| {
                FilePart::new(bytes, filename, content_type)
            }),
    )
}

fn form(name: Option<&String>, email: Option<&String>, file: Option<&FilePart>) -> DecodedUpload {
    let mut form = DecodedUpload::new();
    if let Some(name) = name {
        form = form.with_field("name", name.clone());
    }
    if let Some(email) = email {
        form = form.with_field("email", email.clone());
    }
    if let Some(file) = file {
        form = form.with_file(file.clone());
    }
    form
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    // Validation succeeds exactly when all three values are present, and
    // the request carries them unchanged.
    #[test]
    fn prop_validate_accepts_only_complete_forms(
        name in maybe_text(),
        email in maybe_text(),
        file in maybe_file(),
    ) {
        let result = validate(form(name.as_ref(), email.as_ref(), file.as_ref()));

        match (&name, &email, &file) {
            (Some(name), Some(email), Some(file)) => {
                let request = result.expect("complete form should validate");
                prop_assert_eq!(&request.name, name);
                prop_assert_eq!(&request.email, email);
                prop_assert_eq!(&request.file, file);
            }
            _ => {
                let is_missing = matches!(result, Err(UploadError::MissingFields { .. }));
                prop_assert!(is_missing, "Expected MissingFields error");
            }
        }
    }

    // The error lists exactly the absent values.
    #[test]
    fn prop_missing_fields_are_listed(
        name in maybe_text(),
        email in maybe_text(),
        file in maybe_file(),
    ) {
        prop_assume!(name.is_none() || email.is_none() || file.is_none());

        let Err(UploadError::MissingFields { fields }) =
            validate(form(name.as_ref(), email.as_ref(), file.as_ref()))
        else {
            return Err(TestCaseError::fail("expected MissingFields"));
        };

        prop_assert_eq!(fields.contains(&"file"), file.is_none());
        prop_assert_eq!(fields.contains(&"email"), email.is_none());
        prop_assert_eq!(fields.contains(&"name"), name.is_none());
    }
}

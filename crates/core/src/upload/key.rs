//! Blob key derivation.

use filedrop_shared::KeyStrategy;
use uuid::Uuid;

/// Derive the blob key for an uploaded file.
///
/// With [`KeyStrategy::OriginalFilename`] the caller's filename is used
/// verbatim, so a second upload with the same filename replaces the first.
/// [`KeyStrategy::Generated`] prefixes a fresh UUIDv7 so every upload gets
/// its own key.
#[must_use]
pub fn derive_key(strategy: KeyStrategy, filename: &str) -> String {
    match strategy {
        KeyStrategy::OriginalFilename => filename.to_string(),
        KeyStrategy::Generated => format!("{}/{filename}", Uuid::now_v7()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_original_filename_is_verbatim() {
        assert_eq!(
            derive_key(KeyStrategy::OriginalFilename, "my file (1).pdf"),
            "my file (1).pdf"
        );
        assert_eq!(
            derive_key(KeyStrategy::OriginalFilename, "../etc/passwd"),
            "../etc/passwd"
        );
    }

    #[test]
    fn test_generated_keys_are_unique() {
        let first = derive_key(KeyStrategy::Generated, "notes.txt");
        let second = derive_key(KeyStrategy::Generated, "notes.txt");

        assert_ne!(first, second);
        assert!(first.ends_with("/notes.txt"));

        let (prefix, name) = first.split_once('/').expect("has prefix");
        assert!(Uuid::parse_str(prefix).is_ok());
        assert_eq!(name, "notes.txt");
    }
}

//! Metadata store error types.

use thiserror::Error;

/// Metadata store operation errors.
#[derive(Debug, Error)]
pub enum MetadataStoreError {
    /// The store could not be reached.
    #[error("metadata store unavailable: {0}")]
    Unavailable(String),

    /// The write or lookup was rejected by the store.
    #[error("metadata store error: {0}")]
    Database(String),

    /// A stored row could not be read back as a record.
    #[error("malformed record in {table}: {reason}")]
    MalformedRecord {
        /// Table the row came from.
        table: String,
        /// What was wrong with it.
        reason: String,
    },
}

impl MetadataStoreError {
    /// Create an unavailable error.
    #[must_use]
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }

    /// Create a database error.
    #[must_use]
    pub fn database(msg: impl Into<String>) -> Self {
        Self::Database(msg.into())
    }

    /// Create a malformed record error.
    #[must_use]
    pub fn malformed_record(table: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedRecord {
            table: table.into(),
            reason: reason.into(),
        }
    }
}

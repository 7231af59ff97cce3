//! Upload observability.
//!
//! The orchestrator reports every outcome to an [`UploadObserver`], including
//! the dependency error detail the caller never sees.

use tracing::{error, info, warn};

/// Stages of the upload workflow, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UploadStage {
    /// Parsing the multipart body.
    Decoding,
    /// Checking required fields.
    Validating,
    /// Writing the file to the blob store.
    BlobUpload,
    /// Writing the record to the metadata store.
    MetadataWrite,
}

impl UploadStage {
    /// Stage name for logs.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Decoding => "decoding",
            Self::Validating => "validating",
            Self::BlobUpload => "blob_upload",
            Self::MetadataWrite => "metadata_write",
        }
    }
}

/// Something that happened while handling an upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadEvent {
    /// The request was rejected before any store was called.
    Rejected {
        /// Stage that rejected it.
        stage: UploadStage,
        /// Full error detail.
        reason: String,
    },
    /// A store call failed.
    Failed {
        /// Stage that failed.
        stage: UploadStage,
        /// Target bucket.
        bucket: String,
        /// Derived blob key.
        key: String,
        /// Full error detail.
        error: String,
    },
    /// The blob was stored but has no metadata record.
    OrphanLeft {
        /// Bucket holding the blob.
        bucket: String,
        /// Key of the orphaned blob.
        key: String,
    },
    /// The orphaned blob was deleted.
    OrphanRemoved {
        /// Bucket that held the blob.
        bucket: String,
        /// Key of the deleted blob.
        key: String,
    },
    /// The upload completed.
    Stored {
        /// Bucket holding the blob.
        bucket: String,
        /// Blob key.
        key: String,
        /// Public location.
        file_url: String,
        /// Uploader email.
        email: String,
    },
}

/// Sink for upload events.
pub trait UploadObserver: Send + Sync {
    /// Record an event.
    fn observe(&self, event: &UploadEvent);
}

/// Observer that writes events to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl UploadObserver for TracingObserver {
    fn observe(&self, event: &UploadEvent) {
        match event {
            UploadEvent::Rejected { stage, reason } => {
                info!(stage = stage.as_str(), reason = %reason, "Upload rejected");
            }
            UploadEvent::Failed {
                stage,
                bucket,
                key,
                error,
            } => {
                error!(
                    stage = stage.as_str(),
                    bucket = %bucket,
                    key = %key,
                    error = %error,
                    "Upload failed"
                );
            }
            UploadEvent::OrphanLeft { bucket, key } => {
                warn!(bucket = %bucket, key = %key, "Blob stored without metadata record");
            }
            UploadEvent::OrphanRemoved { bucket, key } => {
                info!(bucket = %bucket, key = %key, "Orphaned blob removed");
            }
            UploadEvent::Stored {
                bucket,
                key,
                file_url,
                email,
            } => {
                info!(
                    bucket = %bucket,
                    key = %key,
                    file_url = %file_url,
                    email = %email,
                    "Upload stored"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use tracing::{Event, Level, Subscriber};
    use tracing_subscriber::layer::{Context, SubscriberExt};
    use tracing_subscriber::Layer;

    use super::*;

    /// Layer that keeps the level of every event.
    #[derive(Clone, Default)]
    struct LevelCapture(Arc<Mutex<Vec<Level>>>);

    impl<S: Subscriber> Layer<S> for LevelCapture {
        fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
            self.0.lock().unwrap().push(*event.metadata().level());
        }
    }

    fn logged_level(event: &UploadEvent) -> Level {
        let capture = LevelCapture::default();
        let subscriber = tracing_subscriber::registry().with(capture.clone());
        tracing::subscriber::with_default(subscriber, || TracingObserver.observe(event));

        let levels = capture.0.lock().unwrap();
        assert_eq!(levels.len(), 1, "expected one event, got {levels:?}");
        levels[0]
    }

    fn bucket_key() -> (String, String) {
        ("user-files".to_string(), "notes.txt".to_string())
    }

    #[test]
    fn test_rejections_log_at_info() {
        let event = UploadEvent::Rejected {
            stage: UploadStage::Validating,
            reason: "missing required fields: email".to_string(),
        };
        assert_eq!(logged_level(&event), Level::INFO);
    }

    #[test]
    fn test_orphans_log_at_warn() {
        let (bucket, key) = bucket_key();
        assert_eq!(
            logged_level(&UploadEvent::OrphanLeft { bucket, key }),
            Level::WARN
        );
    }

    #[test]
    fn test_failures_log_at_error() {
        let (bucket, key) = bucket_key();
        let event = UploadEvent::Failed {
            stage: UploadStage::BlobUpload,
            bucket,
            key,
            error: "timeout".to_string(),
        };
        assert_eq!(logged_level(&event), Level::ERROR);
    }

    #[test]
    fn test_stage_names() {
        assert_eq!(UploadStage::Decoding.as_str(), "decoding");
        assert_eq!(UploadStage::MetadataWrite.as_str(), "metadata_write");
    }
}

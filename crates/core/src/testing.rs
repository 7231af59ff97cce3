//! In-memory fakes for exercising the upload workflow.
//!
//! Enabled for this crate's tests and, through the `testing` feature, for
//! downstream crates.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use bytes::Bytes;
use dashmap::DashMap;

use crate::metadata::{InMemoryMetadataStore, MetadataStore, MetadataStoreError};
use crate::storage::{BlobStore, BlobStoreError, public_location};
use crate::upload::{UploadEvent, UploadObserver, UploadRecord};

/// Blob store that keeps objects in memory and counts calls.
#[derive(Debug)]
pub struct FakeBlobStore {
    base_url: String,
    objects: DashMap<(String, String), (Bytes, String)>,
    uploads: AtomicUsize,
    deletes: AtomicUsize,
    fail_uploads: AtomicBool,
    fail_deletes: AtomicBool,
}

impl FakeBlobStore {
    /// Create a store whose locations start with `base_url`.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            objects: DashMap::new(),
            uploads: AtomicUsize::new(0),
            deletes: AtomicUsize::new(0),
            fail_uploads: AtomicBool::new(false),
            fail_deletes: AtomicBool::new(false),
        }
    }

    /// Make every upload fail.
    pub fn fail_uploads(&self, fail: bool) {
        self.fail_uploads.store(fail, Ordering::SeqCst);
    }

    /// Make every delete fail.
    pub fn fail_deletes(&self, fail: bool) {
        self.fail_deletes.store(fail, Ordering::SeqCst);
    }

    /// Number of upload calls, including failed ones.
    #[must_use]
    pub fn upload_calls(&self) -> usize {
        self.uploads.load(Ordering::SeqCst)
    }

    /// Number of delete calls, including failed ones.
    #[must_use]
    pub fn delete_calls(&self) -> usize {
        self.deletes.load(Ordering::SeqCst)
    }

    /// Stored bytes under `key`, read directly.
    #[must_use]
    pub fn object(&self, bucket: &str, key: &str) -> Option<Bytes> {
        self.objects
            .get(&(bucket.to_string(), key.to_string()))
            .map(|entry| entry.value().0.clone())
    }

    /// Content type stored with `key`.
    #[must_use]
    pub fn content_type(&self, bucket: &str, key: &str) -> Option<String> {
        self.objects
            .get(&(bucket.to_string(), key.to_string()))
            .map(|entry| entry.value().1.clone())
    }

    /// Number of stored objects.
    #[must_use]
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }
}

#[async_trait]
impl BlobStore for FakeBlobStore {
    async fn upload(
        &self,
        bucket: &str,
        key: &str,
        bytes: Bytes,
        content_type: &str,
    ) -> Result<String, BlobStoreError> {
        self.uploads.fetch_add(1, Ordering::SeqCst);
        if self.fail_uploads.load(Ordering::SeqCst) {
            return Err(BlobStoreError::operation("injected upload failure"));
        }
        self.objects.insert(
            (bucket.to_string(), key.to_string()),
            (bytes, content_type.to_string()),
        );
        public_location(&self.base_url, key)
    }

    async fn delete(&self, bucket: &str, key: &str) -> Result<(), BlobStoreError> {
        self.deletes.fetch_add(1, Ordering::SeqCst);
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(BlobStoreError::operation("injected delete failure"));
        }
        self.objects.remove(&(bucket.to_string(), key.to_string()));
        Ok(())
    }

    async fn read(&self, bucket: &str, key: &str) -> Result<Bytes, BlobStoreError> {
        self.object(bucket, key)
            .ok_or_else(|| BlobStoreError::not_found(key))
    }
}

/// Metadata store that keeps records in memory and counts calls.
#[derive(Debug, Default)]
pub struct FakeMetadataStore {
    inner: InMemoryMetadataStore,
    puts: AtomicUsize,
    fail_puts: AtomicBool,
}

impl FakeMetadataStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every put fail.
    pub fn fail_puts(&self, fail: bool) {
        self.fail_puts.store(fail, Ordering::SeqCst);
    }

    /// Number of put calls, including failed ones.
    #[must_use]
    pub fn put_calls(&self) -> usize {
        self.puts.load(Ordering::SeqCst)
    }

    /// All records in `table`.
    #[must_use]
    pub fn records(&self, table: &str) -> Vec<UploadRecord> {
        self.inner.records(table)
    }
}

#[async_trait]
impl MetadataStore for FakeMetadataStore {
    async fn put(&self, table: &str, record: &UploadRecord) -> Result<(), MetadataStoreError> {
        self.puts.fetch_add(1, Ordering::SeqCst);
        if self.fail_puts.load(Ordering::SeqCst) {
            return Err(MetadataStoreError::database("injected put failure"));
        }
        self.inner.put(table, record).await
    }

    async fn get(
        &self,
        table: &str,
        email: &str,
    ) -> Result<Option<UploadRecord>, MetadataStoreError> {
        self.inner.get(table, email).await
    }
}

/// Observer that keeps every event.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<UploadEvent>>,
}

impl RecordingObserver {
    /// Create an empty observer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Events observed so far.
    #[must_use]
    pub fn events(&self) -> Vec<UploadEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl UploadObserver for RecordingObserver {
    fn observe(&self, event: &UploadEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event.clone());
    }
}

//! Blob storage for uploaded files using Apache OpenDAL.
//!
//! This module provides vendor-agnostic object storage with support for:
//! - S3-compatible: AWS S3, Cloudflare R2, MinIO, DigitalOcean Spaces
//! - Azure Blob Storage
//! - Local filesystem (development only)
//! - In-process memory (tests)
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      Apache OpenDAL                              │
//! │                   (Unified Storage API)                          │
//! ├─────────────────────────────────────────────────────────────────┤
//! │ op.write_with("key", data) │ op.read("key")                     │
//! │   .content_type(mime)      │ op.delete("key")                   │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod error;
mod service;
mod store;

pub use config::{StorageConfig, public_location};
pub use error::BlobStoreError;
pub use service::StorageService;
pub use store::BlobStore;

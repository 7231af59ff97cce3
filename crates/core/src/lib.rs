//! Core upload logic for Filedrop.
//!
//! This crate contains the upload workflow with ZERO web or database dependencies.
//! Stores are reached through traits so that the HTTP layer and tests can
//! inject their own implementations.
//!
//! # Modules
//!
//! - `upload` - Validation and orchestration of a single-file upload
//! - `storage` - Blob store contract and the OpenDAL implementation
//! - `metadata` - Metadata store contract and the in-memory implementation

pub mod metadata;
pub mod storage;
pub mod upload;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

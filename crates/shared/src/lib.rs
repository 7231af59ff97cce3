//! Shared configuration for Filedrop.
//!
//! This crate provides the settings consumed by every other crate:
//! - Server binding and body limits
//! - Blob storage provider and bucket
//! - Metadata store connection and table
//! - Upload policy (key strategy, orphan handling)
//! - Cross-origin allow-list

pub mod config;

pub use config::{
    AppConfig, CorsConfig, KeyStrategy, MetadataConfig, OrphanPolicy, ServerConfig,
    StorageProvider, StorageSettings, UploadPolicyConfig,
};

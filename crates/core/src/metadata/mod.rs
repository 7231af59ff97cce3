//! Metadata store for upload records.
//!
//! Records are upserted by email: the latest upload for an address replaces
//! the previous record in the same table.

mod error;
mod memory;
mod store;

pub use error::MetadataStoreError;
pub use memory::InMemoryMetadataStore;
pub use store::MetadataStore;

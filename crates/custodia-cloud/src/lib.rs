//! # custodia-cloud
//!
//! Network-facing clients: the [`BlobStore`] trait with its HTTP and
//! filesystem backends, and the best-effort [`LocationResolver`].  Everything
//! here takes explicit configuration; no client keeps process-global state.

pub mod blob_store;
pub mod config;
pub mod fs_store;
pub mod geo;
pub mod http_store;

mod error;

pub use blob_store::BlobStore;
pub use config::{BlobStoreConfig, GeoConfig};
pub use error::{DownloadError, UploadError};
pub use fs_store::FsBlobStore;
pub use geo::{IpApiResolver, LocationResolver, ResolvedLocation};
pub use http_store::HttpBlobStore;

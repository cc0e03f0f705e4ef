//! # custodia-core
//!
//! The share orchestrator: validates and encrypts a file, uploads the
//! ciphertext, stamps provenance, and appends every later view and onward
//! share to the file's chain of custody.

pub mod history;
pub mod service;

mod error;

pub use error::ShareError;
pub use history::HistoryEntry;
pub use service::{ServiceConfig, ShareService, SharedFile};

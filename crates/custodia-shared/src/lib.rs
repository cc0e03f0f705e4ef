//! # custodia-shared
//!
//! Primitives shared by every Custodia crate: the authenticated file cipher
//! and its wire layout, secure filename generation, and the timestamp format
//! used by the provenance ledger.

pub mod constants;
pub mod crypto;
pub mod filename;
pub mod time;

mod error;

pub use error::CryptoError;

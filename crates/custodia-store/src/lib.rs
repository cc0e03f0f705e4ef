//! # custodia-store
//!
//! The provenance ledger: append-only chain-of-custody records for shared
//! files.  [`ProvenanceLedger`] abstracts the backing document store; the
//! shipped implementation is [`SqliteLedger`], which keeps each record as a
//! row with its event lists embedded as JSON arrays.

pub mod database;
pub mod ledger;
pub mod migrations;
pub mod models;
pub mod records;

mod error;

pub use database::Database;
pub use error::LedgerError;
pub use ledger::{ProvenanceLedger, SqliteLedger};
pub use models::*;

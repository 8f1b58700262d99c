//! Storage abstraction for the append-only connection event ledger.
//!
//! Provides the [`EventLedger`] trait defining the storage contract that all
//! backends implement, plus [`MemoryLedger`] and [`SqliteLedger`] as
//! first-class backends.
//!
//! # Architecture
//!
//! The ledger is strictly append-only: neither backend exposes an update or
//! delete operation, and the "current" meaning of any part is always derived
//! from the event history by the validation layer. Every row gains an
//! [`EventSeq`] at insert; that sequence is the sole recency authority.
//!
//! # Modules
//!
//! - [`error`]: StorageError enum with all failure modes
//! - [`types`]: EventSeq and LedgerEntry storage-layer types
//! - [`traits`]: EventLedger trait definition
//! - [`memory`]: MemoryLedger implementation
//! - [`schema`]: SQL schema constants and migration setup
//! - [`sqlite`]: SqliteLedger implementation

pub mod error;
pub mod memory;
pub mod schema;
pub mod sqlite;
pub mod traits;
pub mod types;

// Re-export key types for ergonomic use.
pub use error::StorageError;
pub use memory::MemoryLedger;
pub use sqlite::SqliteLedger;
pub use traits::EventLedger;
pub use types::{EventSeq, LedgerEntry};

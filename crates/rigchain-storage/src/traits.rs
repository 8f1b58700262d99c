//! The [`EventLedger`] trait defining the storage contract for the
//! append-only event ledger.
//!
//! The contract is intentionally narrow: one atomic append plus read-side
//! queries by part and role. There is no update and no delete -- history is
//! immutable, and the "current" state of any part is derived by the
//! validation layer from the latest event per `(part, role)` slot.
//!
//! All backends (MemoryLedger, SqliteLedger) implement this trait, ensuring
//! they are fully swappable without changing validation logic.

use rigchain_core::event::{ConnectionEvent, Role};
use rigchain_core::part::PartNumber;

use crate::error::StorageError;
use crate::types::{EventSeq, LedgerEntry};

/// The storage contract for the append-only connection event ledger.
///
/// The trait is synchronous (not async): every operation is a single bounded
/// request/response against local storage.
pub trait EventLedger {
    /// Appends one event, atomically, returning its assigned sequence.
    ///
    /// On failure the ledger is unchanged; callers must not assume success
    /// until the sequence is returned.
    fn append(&mut self, event: &ConnectionEvent) -> Result<EventSeq, StorageError>;

    /// All events in which `part` appears in `role`, ascending by sequence.
    fn scan(&self, part: &PartNumber, role: Role) -> Result<Vec<LedgerEntry>, StorageError>;

    /// The greatest-sequence event in which `part` appears in `role`.
    ///
    /// Backends answer this with an indexed lookup, not a full scan.
    fn latest(&self, part: &PartNumber, role: Role)
        -> Result<Option<LedgerEntry>, StorageError>;

    /// The full ledger in sequence order.
    fn all(&self) -> Result<Vec<LedgerEntry>, StorageError>;

    /// Number of rows in the ledger.
    fn len(&self) -> Result<usize, StorageError>;

    /// Whether the ledger holds no rows.
    fn is_empty(&self) -> Result<bool, StorageError> {
        Ok(self.len()? == 0)
    }
}

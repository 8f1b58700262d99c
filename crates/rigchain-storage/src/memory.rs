//! In-memory implementation of [`EventLedger`].
//!
//! [`MemoryLedger`] is a first-class backend for tests and ephemeral
//! sessions. It keeps the ledger as a plain `Vec` in insert order with
//! identical semantics to the SQLite backend: append-only, sequences
//! assigned monotonically at insert.

use rigchain_core::event::{ConnectionEvent, Role};
use rigchain_core::part::PartNumber;

use crate::error::StorageError;
use crate::traits::EventLedger;
use crate::types::{EventSeq, LedgerEntry};

/// In-memory append-only ledger.
#[derive(Debug, Default, Clone)]
pub struct MemoryLedger {
    rows: Vec<LedgerEntry>,
    next_seq: i64,
}

impl MemoryLedger {
    pub fn new() -> MemoryLedger {
        MemoryLedger {
            rows: Vec::new(),
            next_seq: 1,
        }
    }
}

impl EventLedger for MemoryLedger {
    fn append(&mut self, event: &ConnectionEvent) -> Result<EventSeq, StorageError> {
        let seq = EventSeq(self.next_seq);
        self.next_seq += 1;
        self.rows.push(LedgerEntry {
            seq,
            event: event.clone(),
        });
        Ok(seq)
    }

    fn scan(&self, part: &PartNumber, role: Role) -> Result<Vec<LedgerEntry>, StorageError> {
        Ok(self
            .rows
            .iter()
            .filter(|entry| entry.event.part_in_role(role) == part)
            .cloned()
            .collect())
    }

    fn latest(
        &self,
        part: &PartNumber,
        role: Role,
    ) -> Result<Option<LedgerEntry>, StorageError> {
        // Rows are in sequence order, so the last match is the latest.
        Ok(self
            .rows
            .iter()
            .rev()
            .find(|entry| entry.event.part_in_role(role) == part)
            .cloned())
    }

    fn all(&self) -> Result<Vec<LedgerEntry>, StorageError> {
        Ok(self.rows.clone())
    }

    fn len(&self) -> Result<usize, StorageError> {
        Ok(self.rows.len())
    }
}

//! Storage-layer types for event identity.
//!
//! [`EventSeq`] is defined here (not in rigchain-core) because event identity
//! is a storage concern -- an event only gains a sequence when appended, and
//! that sequence is what makes "latest" well defined.

use std::fmt;

use serde::{Deserialize, Serialize};

use rigchain_core::event::ConnectionEvent;

/// Monotonically increasing sequence assigned to an event at insert.
///
/// The sole recency authority for occupancy resolution. The inner `i64`
/// aligns with SQLite's `INTEGER PRIMARY KEY`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EventSeq(pub i64);

impl fmt::Display for EventSeq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A persisted ledger row: the immutable event plus its assigned sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub seq: EventSeq,
    pub event: ConnectionEvent,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_seq_orders_by_inner_value() {
        assert!(EventSeq(1) < EventSeq(2));
        assert_eq!(EventSeq(7).to_string(), "7");
    }
}

//! The rejection taxonomy for connect/disconnect requests.
//!
//! Every outcome is reported synchronously as a typed value; the core never
//! silently ignores or auto-corrects anything, and never retries on its own.
//! [`Rejection::Busy`] is the single transient kind -- the caller may retry
//! it. All other kinds require a different input or operator intervention.

use thiserror::Error;

use rigchain_core::event::Role;
use rigchain_core::part::{PartNumber, PartType};
use rigchain_storage::StorageError;

/// Why a proposed connect or disconnect was refused.
#[derive(Debug, Error)]
pub enum Rejection {
    /// The part is not in the directory (or its structured identifier is
    /// syntactically invalid).
    #[error("unknown part: {part}")]
    UnknownPart { part: PartNumber },

    /// The proposed edge breaks the fixed chain order.
    #[error("sequence violation: {source_type} may not feed {target_type}")]
    SequenceViolation {
        source_type: PartType,
        target_type: PartType,
    },

    /// SNAP may never be a source; ANTENNA may never be a target.
    #[error("direction violation: {part} ({part_type}) cannot take that side of a connection")]
    DirectionViolation {
        part: PartNumber,
        part_type: PartType,
    },

    /// The slot is already occupied by a live connection.
    #[error("{part} is already connected as {role:?} to {partner}")]
    AlreadyConnected {
        part: PartNumber,
        role: Role,
        partner: PartNumber,
    },

    /// Disconnect named a pair that is not currently connected.
    #[error("{source_part} is not currently connected to {target}")]
    NotConnected {
        source_part: PartNumber,
        target: PartNumber,
    },

    /// The two endpoints of a claimed connection disagree about each other.
    ///
    /// `claimed` is the partner recorded on the queried side; `actual` is
    /// what the partner's own latest event says (None if that slot is free).
    #[error("ledger drift: {part} claims partner {claimed}, but that slot shows {actual:?}")]
    LedgerDrift {
        part: PartNumber,
        claimed: PartNumber,
        actual: Option<PartNumber>,
    },

    /// Concurrent-access contention. Retryable.
    #[error("busy: another caller holds the affected parts")]
    Busy,

    /// The ledger write failed. Not retryable without operator intervention.
    #[error("storage failure: {0}")]
    Storage(StorageError),
}

impl From<StorageError> for Rejection {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Busy => Rejection::Busy,
            other => Rejection::Storage(other),
        }
    }
}

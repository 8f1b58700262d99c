//! Latest-wins occupancy resolution.
//!
//! For a given `(part, role)` slot the authoritative state is the single
//! greatest-sequence event in which the part appears in that role. No event,
//! or a latest event with `Disconnected` status, means the slot is free;
//! otherwise it is occupied by the partner on the opposite side of that same
//! event. This is what lets a part cycle connect → disconnect → connect to a
//! new partner arbitrarily many times over an append-only log.

use chrono::{DateTime, Utc};
use serde::Serialize;

use rigchain_core::event::{ConnectionStatus, Role};
use rigchain_core::part::{PartNumber, PartType, Polarization};
use rigchain_storage::{EventLedger, EventSeq, StorageError};

/// Current state of one `(part, role)` slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Occupancy {
    /// No live connection in this role.
    Free,
    /// Bound to `partner` by the event at `seq`.
    Occupied {
        partner: PartNumber,
        partner_type: PartType,
        partner_polarization: Polarization,
        /// When this part was scanned into the connection.
        connected_at: DateTime<Utc>,
        seq: EventSeq,
    },
}

impl Occupancy {
    pub fn is_free(&self) -> bool {
        matches!(self, Occupancy::Free)
    }

    /// The current partner, if the slot is occupied.
    pub fn partner(&self) -> Option<&PartNumber> {
        match self {
            Occupancy::Free => None,
            Occupancy::Occupied { partner, .. } => Some(partner),
        }
    }
}

/// Both role slots of a part, as rendered for callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PartStatus {
    pub source: Occupancy,
    pub target: Occupancy,
}

/// Resolves the current occupancy of `(part, role)` from the ledger.
///
/// A replayed (duplicate) connect event cannot double-occupy a slot: only
/// the latest of the duplicates is consulted, and it describes the same
/// single connection.
pub fn resolve(
    ledger: &dyn EventLedger,
    part: &PartNumber,
    role: Role,
) -> Result<Occupancy, StorageError> {
    let Some(entry) = ledger.latest(part, role)? else {
        return Ok(Occupancy::Free);
    };
    if entry.event.status == ConnectionStatus::Disconnected {
        return Ok(Occupancy::Free);
    }

    let partner_role = role.opposite();
    let partner_profile = entry.event.profile_in_role(partner_role);
    Ok(Occupancy::Occupied {
        partner: entry.event.part_in_role(partner_role).clone(),
        partner_type: partner_profile.part_type,
        partner_polarization: partner_profile.polarization,
        connected_at: entry.event.scan_time_in_role(role),
        seq: entry.seq,
    })
}

/// Resolves both role slots of a part.
pub fn status_of(ledger: &dyn EventLedger, part: &PartNumber) -> Result<PartStatus, StorageError> {
    Ok(PartStatus {
        source: resolve(ledger, part, Role::Source)?,
        target: resolve(ledger, part, Role::Target)?,
    })
}

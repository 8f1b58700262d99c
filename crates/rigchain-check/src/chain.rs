//! Chain reconstruction: the logical sequence of connected parts from
//! antenna to digitizer, derived by following currently-Connected edges.
//!
//! Purely read-side. From any part the walk follows the Target role upstream
//! and the Source role downstream until a free slot ends it. Link metadata
//! for partners comes from the events themselves (denormalized at write
//! time), so parts later removed from the directory still render in
//! historical chains. A drifted ledger containing a cycle terminates the
//! walk rather than hanging it.

use std::collections::HashSet;

use serde::Serialize;
use tracing::warn;

use rigchain_core::directory::PartDirectory;
use rigchain_core::event::Role;
use rigchain_core::part::{PartNumber, PartType, Polarization};
use rigchain_storage::EventLedger;

use crate::occupancy::{self, Occupancy};
use crate::reject::Rejection;
use crate::validator::ChainValidator;

/// One part in a reconstructed chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChainLink {
    pub part: PartNumber,
    pub part_type: PartType,
    pub polarization: Polarization,
}

/// An ordered run of connected parts, antenna side first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Chain {
    pub links: Vec<ChainLink>,
}

impl Chain {
    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Whether the chain runs the full topology, antenna through digitizer.
    pub fn is_complete(&self) -> bool {
        matches!(self.links.first(), Some(head) if head.part_type == PartType::Antenna)
            && matches!(self.links.last(), Some(tail) if tail.part_type == PartType::Snap)
    }
}

/// Reconstructs the chain through `part` from the current ledger state.
pub fn trace<D, L>(directory: &D, ledger: &L, part: &PartNumber) -> Result<Chain, Rejection>
where
    D: PartDirectory,
    L: EventLedger,
{
    let profile = directory
        .lookup(part)
        .ok_or_else(|| Rejection::UnknownPart { part: part.clone() })?;

    let mut seen: HashSet<PartNumber> = HashSet::new();
    seen.insert(part.clone());

    // Upstream: who feeds this part, transitively.
    let mut upstream = Vec::new();
    let mut cursor = part.clone();
    while let Occupancy::Occupied {
        partner,
        partner_type,
        partner_polarization,
        ..
    } = occupancy::resolve(ledger, &cursor, Role::Target)?
    {
        if !seen.insert(partner.clone()) {
            warn!(part = %partner, "cycle in ledger, stopping upstream walk");
            break;
        }
        upstream.push(ChainLink {
            part: partner.clone(),
            part_type: partner_type,
            polarization: partner_polarization,
        });
        cursor = partner;
    }
    upstream.reverse();

    let mut links = upstream;
    links.push(ChainLink {
        part: part.clone(),
        part_type: profile.part_type,
        polarization: profile.polarization,
    });

    // Downstream: who this part feeds, transitively.
    let mut cursor = part.clone();
    while let Occupancy::Occupied {
        partner,
        partner_type,
        partner_polarization,
        ..
    } = occupancy::resolve(ledger, &cursor, Role::Source)?
    {
        if !seen.insert(partner.clone()) {
            warn!(part = %partner, "cycle in ledger, stopping downstream walk");
            break;
        }
        links.push(ChainLink {
            part: partner.clone(),
            part_type: partner_type,
            polarization: partner_polarization,
        });
        cursor = partner;
    }

    Ok(Chain { links })
}

impl<D: PartDirectory, L: EventLedger> ChainValidator<D, L> {
    /// Reconstructs the chain through `part`. See [`trace`].
    pub fn trace_chain(&self, part: &PartNumber) -> Result<Chain, Rejection> {
        trace(self.directory(), self.ledger(), part)
    }
}

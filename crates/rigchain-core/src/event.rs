//! The immutable connection event payload and its supporting enums.
//!
//! A [`ConnectionEvent`] is written exactly once when the validator approves
//! a connect or disconnect, read many times by occupancy resolution, and
//! never updated or deleted. Part metadata is denormalized into the event at
//! write time, so later directory edits cannot retroactively alter history.
//!
//! Events carry no sequence number here: event identity is a storage
//! concern, assigned by the ledger at insert.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::part::{PartNumber, PartProfile, PartType, Polarization};

/// Whether an event records a connection being made or severed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConnectionStatus {
    Connected,
    Disconnected,
}

impl ConnectionStatus {
    /// Canonical TEXT form, used in storage columns.
    pub fn as_str(self) -> &'static str {
        match self {
            ConnectionStatus::Connected => "Connected",
            ConnectionStatus::Disconnected => "Disconnected",
        }
    }

    pub fn parse(s: &str) -> Option<ConnectionStatus> {
        match s {
            "Connected" => Some(ConnectionStatus::Connected),
            "Disconnected" => Some(ConnectionStatus::Disconnected),
            _ => None,
        }
    }
}

/// The role a part plays within a connection.
///
/// Occupancy is tracked per role, not per part: each physical part has one
/// incoming and one outgoing port, so a part occupied as Target may still
/// become a Source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// The upstream side of the edge (signal flows out of this part).
    Source,
    /// The downstream side of the edge (signal flows into this part).
    Target,
}

impl Role {
    /// The role on the other side of the same edge.
    pub fn opposite(self) -> Role {
        match self {
            Role::Source => Role::Target,
            Role::Target => Role::Source,
        }
    }
}

/// One append-only record of a connect or disconnect between two parts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionEvent {
    pub source_part: PartNumber,
    pub source_type: PartType,
    pub source_polarization: Polarization,
    pub source_scan_time: DateTime<Utc>,
    pub target_part: PartNumber,
    pub target_type: PartType,
    pub target_polarization: Polarization,
    pub target_scan_time: DateTime<Utc>,
    pub status: ConnectionStatus,
}

impl ConnectionEvent {
    /// Builds an event for the given pair with both sides scanned now.
    pub fn now(
        source: &PartNumber,
        source_profile: PartProfile,
        target: &PartNumber,
        target_profile: PartProfile,
        status: ConnectionStatus,
    ) -> ConnectionEvent {
        let now = Utc::now();
        ConnectionEvent {
            source_part: source.clone(),
            source_type: source_profile.part_type,
            source_polarization: source_profile.polarization,
            source_scan_time: now,
            target_part: target.clone(),
            target_type: target_profile.part_type,
            target_polarization: target_profile.polarization,
            target_scan_time: now,
            status,
        }
    }

    /// The part playing `role` in this event.
    pub fn part_in_role(&self, role: Role) -> &PartNumber {
        match role {
            Role::Source => &self.source_part,
            Role::Target => &self.target_part,
        }
    }

    /// Metadata of the part playing `role` in this event.
    pub fn profile_in_role(&self, role: Role) -> PartProfile {
        match role {
            Role::Source => PartProfile {
                part_type: self.source_type,
                polarization: self.source_polarization,
            },
            Role::Target => PartProfile {
                part_type: self.target_type,
                polarization: self.target_polarization,
            },
        }
    }

    /// Scan time recorded for the part playing `role`.
    pub fn scan_time_in_role(&self, role: Role) -> DateTime<Utc> {
        match role {
            Role::Source => self.source_scan_time,
            Role::Target => self.target_scan_time,
        }
    }
}

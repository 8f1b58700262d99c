//! Part identity: part numbers, part types with their fixed chain order,
//! polarization, and the structured SNAP identifier sub-format.
//!
//! The chain order is process-wide static configuration:
//! `ANTENNA < LNA < COAX1 < COAX2 < BACBOARD < SNAP`. Every legal connection
//! steps exactly one rank forward.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// The type of a physical part, ordered by its position in the signal chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PartType {
    /// Antenna element, head of every chain.
    Antenna,
    /// Low-noise amplifier.
    Lna,
    /// First coax cable stage.
    Coax1,
    /// Second coax cable stage.
    Coax2,
    /// Backboard feed-through.
    Bacboard,
    /// SNAP digitizer input, tail of every chain.
    Snap,
}

impl PartType {
    /// Position of this type in the fixed chain order, starting at 0.
    pub fn rank(self) -> u8 {
        match self {
            PartType::Antenna => 0,
            PartType::Lna => 1,
            PartType::Coax1 => 2,
            PartType::Coax2 => 3,
            PartType::Bacboard => 4,
            PartType::Snap => 5,
        }
    }

    /// The only type a part of this type may legally connect into.
    ///
    /// `None` for [`PartType::Snap`], which terminates the chain.
    pub fn successor(self) -> Option<PartType> {
        match self {
            PartType::Antenna => Some(PartType::Lna),
            PartType::Lna => Some(PartType::Coax1),
            PartType::Coax1 => Some(PartType::Coax2),
            PartType::Coax2 => Some(PartType::Bacboard),
            PartType::Bacboard => Some(PartType::Snap),
            PartType::Snap => None,
        }
    }

    /// Canonical TEXT form, used in storage columns and display.
    pub fn as_str(self) -> &'static str {
        match self {
            PartType::Antenna => "ANTENNA",
            PartType::Lna => "LNA",
            PartType::Coax1 => "COAX1",
            PartType::Coax2 => "COAX2",
            PartType::Bacboard => "BACBOARD",
            PartType::Snap => "SNAP",
        }
    }

    /// Parses the canonical TEXT form.
    pub fn parse(s: &str) -> Option<PartType> {
        match s {
            "ANTENNA" => Some(PartType::Antenna),
            "LNA" => Some(PartType::Lna),
            "COAX1" => Some(PartType::Coax1),
            "COAX2" => Some(PartType::Coax2),
            "BACBOARD" => Some(PartType::Bacboard),
            "SNAP" => Some(PartType::Snap),
            _ => None,
        }
    }
}

impl fmt::Display for PartType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Signal polarization carried by a part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Polarization {
    P1,
    P2,
}

impl Polarization {
    pub fn as_str(self) -> &'static str {
        match self {
            Polarization::P1 => "P1",
            Polarization::P2 => "P2",
        }
    }

    pub fn parse(s: &str) -> Option<Polarization> {
        match s {
            "P1" => Some(Polarization::P1),
            "P2" => Some(Polarization::P2),
            _ => None,
        }
    }
}

impl fmt::Display for Polarization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Unique identifier of a physical part.
///
/// Normalized on construction (trimmed, uppercased) so that scanned input
/// compares equal regardless of scanner casing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PartNumber(String);

impl PartNumber {
    /// Normalizes and wraps a raw scanned string.
    pub fn new(raw: &str) -> Result<PartNumber, CoreError> {
        let normalized = raw.trim().to_uppercase();
        if normalized.is_empty() {
            return Err(CoreError::EmptyPartNumber);
        }
        Ok(PartNumber(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PartNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Declared metadata for a part, as answered by the part directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartProfile {
    pub part_type: PartType,
    pub polarization: Polarization,
}

impl PartProfile {
    /// Infers a profile from the standard part-number encoding, if any.
    ///
    /// Non-SNAP parts carry a three-letter type prefix and a trailing
    /// polarization suffix (`ANT00001P1`, `CX200014P2`). SNAP parts use the
    /// structured chassis/slot/port form parsed by [`SnapId`]. Returns `None`
    /// for any string that matches neither encoding; the directory reports
    /// those as unknown.
    pub fn infer(part: &PartNumber) -> Option<PartProfile> {
        let s = part.as_str();

        if s.starts_with("SNP") {
            let snap = SnapId::parse(s).ok()?;
            return Some(PartProfile {
                part_type: PartType::Snap,
                polarization: snap.polarization(),
            });
        }

        let part_type = match s.get(..3)? {
            "ANT" => PartType::Antenna,
            "LNA" => PartType::Lna,
            "CX1" => PartType::Coax1,
            "CX2" => PartType::Coax2,
            "BCB" => PartType::Bacboard,
            _ => return None,
        };

        let polarization = Polarization::parse(s.get(s.len().checked_sub(2)?..)?)?;
        // Everything between prefix and suffix must be a serial number.
        let serial = &s[3..s.len() - 2];
        if serial.is_empty() || !serial.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }

        Some(PartProfile {
            part_type,
            polarization,
        })
    }
}

/// Structured identifier of a SNAP digitizer input: chassis, slot, and port.
///
/// Canonical text form is `SNPC<chassis>S<slot>P<port>` with decimal fields,
/// e.g. `SNPC02S10P3`. Polarization is fixed by the port wiring: even ports
/// carry P1, odd ports carry P2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SnapId {
    pub chassis: u8,
    pub slot: u8,
    pub port: u8,
}

impl SnapId {
    /// Parses the canonical `SNPC<chassis>S<slot>P<port>` form.
    pub fn parse(raw: &str) -> Result<SnapId, CoreError> {
        let invalid = |reason: &str| CoreError::InvalidSnapId {
            raw: raw.to_string(),
            reason: reason.to_string(),
        };

        let rest = raw
            .strip_prefix("SNPC")
            .ok_or_else(|| invalid("missing SNPC prefix"))?;
        let (chassis, rest) = rest
            .split_once('S')
            .ok_or_else(|| invalid("missing slot field"))?;
        let (slot, port) = rest
            .split_once('P')
            .ok_or_else(|| invalid("missing port field"))?;

        let chassis: u8 = chassis
            .parse()
            .map_err(|_| invalid("chassis is not a number"))?;
        let slot: u8 = slot.parse().map_err(|_| invalid("slot is not a number"))?;
        let port: u8 = port.parse().map_err(|_| invalid("port is not a number"))?;

        Ok(SnapId {
            chassis,
            slot,
            port,
        })
    }

    /// Polarization implied by the port wiring convention.
    pub fn polarization(self) -> Polarization {
        if self.port % 2 == 0 {
            Polarization::P1
        } else {
            Polarization::P2
        }
    }
}

impl fmt::Display for SnapId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SNPC{:02}S{:02}P{}", self.chassis, self.slot, self.port)
    }
}

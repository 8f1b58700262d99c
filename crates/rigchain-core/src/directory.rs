//! The [`PartDirectory`] oracle and its in-memory adapter.
//!
//! The validator core owns no part metadata. It asks a directory for the
//! declared type and polarization of a scanned part number and treats any
//! part the directory cannot answer for as unknown. Format validation of
//! structured identifiers (the SNAP chassis/slot/port encoding) is the
//! directory's responsibility, so a syntactically invalid SNAP identifier
//! simply resolves to `None` here.

use std::collections::HashMap;

use crate::part::{PartNumber, PartProfile};

/// Read-only oracle mapping part numbers to declared metadata.
pub trait PartDirectory {
    /// Returns the declared profile of `part`, or `None` if the part is
    /// unknown (including syntactically invalid structured identifiers).
    fn lookup(&self, part: &PartNumber) -> Option<PartProfile>;
}

/// Directory backed by an in-memory registry.
///
/// First-class adapter for tests and embedding callers. Parts are registered
/// explicitly; [`InMemoryDirectory::register`] infers the profile from the
/// standard part-number encoding, while [`InMemoryDirectory::insert`] accepts
/// an explicit profile for parts with nonstandard numbers.
#[derive(Debug, Default, Clone)]
pub struct InMemoryDirectory {
    parts: HashMap<PartNumber, PartProfile>,
}

impl InMemoryDirectory {
    pub fn new() -> InMemoryDirectory {
        InMemoryDirectory {
            parts: HashMap::new(),
        }
    }

    /// Registers a part, inferring its profile from the part-number encoding.
    ///
    /// Returns `false` (and registers nothing) if the encoding is not
    /// recognized; such parts stay unknown to lookups.
    pub fn register(&mut self, part: &PartNumber) -> bool {
        match PartProfile::infer(part) {
            Some(profile) => {
                self.parts.insert(part.clone(), profile);
                true
            }
            None => false,
        }
    }

    /// Registers a part with an explicit profile.
    pub fn insert(&mut self, part: PartNumber, profile: PartProfile) {
        self.parts.insert(part, profile);
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }
}

impl PartDirectory for InMemoryDirectory {
    fn lookup(&self, part: &PartNumber) -> Option<PartProfile> {
        self.parts.get(part).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::part::{PartType, Polarization};

    fn part(raw: &str) -> PartNumber {
        PartNumber::new(raw).unwrap()
    }

    #[test]
    fn registered_parts_resolve() {
        let mut dir = InMemoryDirectory::new();
        assert!(dir.register(&part("ANT00001P1")));
        assert!(dir.register(&part("SNPC02S10P3")));

        let ant = dir.lookup(&part("ANT00001P1")).unwrap();
        assert_eq!(ant.part_type, PartType::Antenna);
        assert_eq!(ant.polarization, Polarization::P1);

        let snap = dir.lookup(&part("SNPC02S10P3")).unwrap();
        assert_eq!(snap.part_type, PartType::Snap);
        assert_eq!(snap.polarization, Polarization::P2);
    }

    #[test]
    fn unregistered_and_malformed_parts_are_unknown() {
        let mut dir = InMemoryDirectory::new();
        dir.register(&part("ANT00001P1"));

        // Well-formed but never registered.
        assert!(dir.lookup(&part("ANT00002P1")).is_none());
        // Malformed SNAP identifier refuses registration entirely.
        assert!(!dir.register(&part("SNP02S10P3")));
        assert!(dir.lookup(&part("SNP02S10P3")).is_none());
    }

    #[test]
    fn explicit_insert_bypasses_inference() {
        let mut dir = InMemoryDirectory::new();
        let odd = part("LEGACY-7");
        dir.insert(
            odd.clone(),
            PartProfile {
                part_type: PartType::Bacboard,
                polarization: Polarization::P1,
            },
        );
        assert_eq!(dir.lookup(&odd).unwrap().part_type, PartType::Bacboard);
    }
}

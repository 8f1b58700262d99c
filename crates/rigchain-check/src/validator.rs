//! The chain validator: the rule engine approving or rejecting proposed
//! connections and disconnections.
//!
//! For a proposed edge the validator resolves both parts through the
//! directory, derives their current occupancy from the ledger, and applies
//! the rules in order: known parts, legal direction, legal type order, no
//! duplicate occupancy. On approval it appends exactly one event; on
//! rejection it returns a specific [`Rejection`] and touches nothing.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use rigchain_core::directory::PartDirectory;
use rigchain_core::event::{ConnectionEvent, ConnectionStatus, Role};
use rigchain_core::part::{PartNumber, PartProfile, PartType};
use rigchain_storage::{EventLedger, EventSeq, LedgerEntry, StorageError};

use crate::occupancy::{self, Occupancy, PartStatus};
use crate::reject::Rejection;

/// The closed set of requests a caller may submit.
///
/// Dispatched by exhaustive match in [`ChainValidator::submit`]; there is no
/// other way to mutate the ledger through this crate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChainRequest {
    Connect {
        source: PartNumber,
        target: PartNumber,
    },
    Disconnect {
        source: PartNumber,
        target: PartNumber,
    },
}

/// Rule engine over one part directory and one event ledger.
///
/// The ledger is an explicitly passed handle, never ambient global state, so
/// every test can run against its own independent in-memory ledger. For
/// shared multi-caller use, wrap the validator in
/// [`ChainStation`](crate::station::ChainStation).
pub struct ChainValidator<D, L> {
    directory: D,
    ledger: L,
}

impl<D: PartDirectory, L: EventLedger> ChainValidator<D, L> {
    pub fn new(directory: D, ledger: L) -> ChainValidator<D, L> {
        ChainValidator { directory, ledger }
    }

    /// Read access to the underlying ledger.
    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    /// Read access to the part directory.
    pub fn directory(&self) -> &D {
        &self.directory
    }

    /// Dispatches a request to the matching operation.
    pub fn submit(&mut self, request: ChainRequest) -> Result<EventSeq, Rejection> {
        match request {
            ChainRequest::Connect { source, target } => self.connect(&source, &target),
            ChainRequest::Disconnect { source, target } => self.disconnect(&source, &target),
        }
    }

    /// Validates and records a new connection `source -> target`.
    pub fn connect(
        &mut self,
        source: &PartNumber,
        target: &PartNumber,
    ) -> Result<EventSeq, Rejection> {
        let source_profile = self.profile_of(source)?;
        let target_profile = self.profile_of(target)?;

        // Direction is ruled on before the type order so that a SNAP source
        // or ANTENNA target is always reported as a direction problem, no
        // matter what sits on the other side.
        if source_profile.part_type == PartType::Snap {
            debug!(%source, "rejected connect: SNAP cannot be a source");
            return Err(Rejection::DirectionViolation {
                part: source.clone(),
                part_type: PartType::Snap,
            });
        }
        if target_profile.part_type == PartType::Antenna {
            debug!(%target, "rejected connect: ANTENNA cannot be a target");
            return Err(Rejection::DirectionViolation {
                part: target.clone(),
                part_type: PartType::Antenna,
            });
        }

        if source_profile.part_type.successor() != Some(target_profile.part_type) {
            debug!(
                %source, %target,
                source_type = %source_profile.part_type,
                target_type = %target_profile.part_type,
                "rejected connect: chain order violated"
            );
            return Err(Rejection::SequenceViolation {
                source_type: source_profile.part_type,
                target_type: target_profile.part_type,
            });
        }

        self.ensure_free(source, Role::Source)?;
        self.ensure_free(target, Role::Target)?;

        let event = ConnectionEvent::now(
            source,
            source_profile,
            target,
            target_profile,
            ConnectionStatus::Connected,
        );
        let seq = self.ledger.append(&event)?;
        debug!(%source, %target, %seq, "connected");
        Ok(seq)
    }

    /// Validates and records the disconnection of the currently connected
    /// pair `source -> target`.
    ///
    /// Disconnection must name the exact live pair; it cannot sever an
    /// arbitrary historical edge.
    pub fn disconnect(
        &mut self,
        source: &PartNumber,
        target: &PartNumber,
    ) -> Result<EventSeq, Rejection> {
        let source_profile = self.profile_of(source)?;
        let target_profile = self.profile_of(target)?;

        let source_slot = occupancy::resolve(&self.ledger, source, Role::Source)?;
        match source_slot.partner() {
            Some(partner) if partner == target => {}
            _ => {
                debug!(%source, %target, "rejected disconnect: pair not currently connected");
                return Err(Rejection::NotConnected {
                    source_part: source.clone(),
                    target: target.clone(),
                });
            }
        }

        // Both endpoints of a live connection must agree about each other.
        // A mismatch means the ledger has drifted (e.g. a missed
        // disconnect); refuse to sever anything until an operator resolves
        // it rather than silently trusting one side.
        let target_slot = occupancy::resolve(&self.ledger, target, Role::Target)?;
        if target_slot.partner() != Some(source) {
            warn!(
                %source, %target,
                actual = ?target_slot.partner(),
                "ledger drift detected on disconnect"
            );
            return Err(Rejection::LedgerDrift {
                part: source.clone(),
                claimed: target.clone(),
                actual: target_slot.partner().cloned(),
            });
        }

        let event = ConnectionEvent::now(
            source,
            source_profile,
            target,
            target_profile,
            ConnectionStatus::Disconnected,
        );
        let seq = self.ledger.append(&event)?;
        debug!(%source, %target, %seq, "disconnected");
        Ok(seq)
    }

    /// Current occupancy of both role slots of a part.
    ///
    /// Read-only; used by front ends to render prompts before submitting.
    pub fn status_of(&self, part: &PartNumber) -> Result<PartStatus, Rejection> {
        if self.directory.lookup(part).is_none() {
            return Err(Rejection::UnknownPart { part: part.clone() });
        }
        Ok(occupancy::status_of(&self.ledger, part)?)
    }

    /// Every event in which the part appears in either role, in sequence
    /// order.
    pub fn history_of(&self, part: &PartNumber) -> Result<Vec<LedgerEntry>, StorageError> {
        let mut entries = self.ledger.scan(part, Role::Source)?;
        entries.extend(self.ledger.scan(part, Role::Target)?);
        entries.sort_by_key(|entry| entry.seq);
        Ok(entries)
    }

    fn profile_of(&self, part: &PartNumber) -> Result<PartProfile, Rejection> {
        self.directory.lookup(part).ok_or_else(|| {
            debug!(%part, "unknown part");
            Rejection::UnknownPart { part: part.clone() }
        })
    }

    fn ensure_free(&self, part: &PartNumber, role: Role) -> Result<(), Rejection> {
        match occupancy::resolve(&self.ledger, part, role)? {
            Occupancy::Free => Ok(()),
            Occupancy::Occupied { partner, .. } => {
                debug!(%part, ?role, %partner, "rejected connect: slot occupied");
                Err(Rejection::AlreadyConnected {
                    part: part.clone(),
                    role,
                    partner,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rigchain_core::directory::InMemoryDirectory;
    use rigchain_storage::MemoryLedger;

    fn part(raw: &str) -> PartNumber {
        PartNumber::new(raw).unwrap()
    }

    /// Directory preloaded with two full chains' worth of parts.
    fn directory() -> InMemoryDirectory {
        let mut dir = InMemoryDirectory::new();
        for raw in [
            "ANT00001P1", "ANT00002P1", "LNA00001P1", "LNA00002P1", "CX100001P1",
            "CX100002P1", "CX200001P1", "CX200002P1", "BCB00001P1", "BCB00002P1",
            "SNPC00S00P0", "SNPC00S01P0",
        ] {
            assert!(dir.register(&part(raw)), "{raw}");
        }
        dir
    }

    fn validator() -> ChainValidator<InMemoryDirectory, MemoryLedger> {
        ChainValidator::new(directory(), MemoryLedger::new())
    }

    #[test]
    fn first_connect_between_free_adjacent_parts_succeeds() {
        let mut v = validator();
        for (source, target) in [
            ("ANT00001P1", "LNA00001P1"),
            ("LNA00001P1", "CX100001P1"),
            ("CX100001P1", "CX200001P1"),
            ("CX200001P1", "BCB00001P1"),
            ("BCB00001P1", "SNPC00S00P0"),
        ] {
            v.connect(&part(source), &part(target)).unwrap();
        }
        assert_eq!(v.ledger().len().unwrap(), 5);
    }

    #[test]
    fn unknown_parts_are_rejected() {
        let mut v = validator();
        let err = v.connect(&part("ANT99999P1"), &part("LNA00001P1")).unwrap_err();
        assert!(matches!(err, Rejection::UnknownPart { .. }), "{err}");

        let err = v.connect(&part("ANT00001P1"), &part("LNA99999P1")).unwrap_err();
        assert!(matches!(err, Rejection::UnknownPart { .. }), "{err}");

        // A malformed SNAP identifier is unknown, not a distinct error kind.
        let err = v.connect(&part("BCB00001P1"), &part("SNPXXS00P0")).unwrap_err();
        assert!(matches!(err, Rejection::UnknownPart { .. }), "{err}");
    }

    #[test]
    fn skipping_a_stage_is_a_sequence_violation() {
        let mut v = validator();
        let err = v.connect(&part("ANT00001P1"), &part("CX100001P1")).unwrap_err();
        match err {
            Rejection::SequenceViolation {
                source_type,
                target_type,
            } => {
                assert_eq!(source_type, PartType::Antenna);
                assert_eq!(target_type, PartType::Coax1);
            }
            other => panic!("expected SequenceViolation, got {other}"),
        }

        // Backwards is also a sequence violation.
        let err = v.connect(&part("LNA00001P1"), &part("CX200001P1")).unwrap_err();
        assert!(matches!(err, Rejection::SequenceViolation { .. }), "{err}");
    }

    #[test]
    fn snap_as_source_is_a_direction_violation_for_every_partner() {
        let mut v = validator();
        for target in [
            "ANT00001P1", "LNA00001P1", "CX100001P1", "CX200001P1", "BCB00001P1",
            "SNPC00S01P0",
        ] {
            let err = v.connect(&part("SNPC00S00P0"), &part(target)).unwrap_err();
            assert!(matches!(err, Rejection::DirectionViolation { .. }), "{target}: {err}");
        }
    }

    #[test]
    fn antenna_as_target_is_a_direction_violation_for_every_partner() {
        let mut v = validator();
        for source in [
            "ANT00002P1", "LNA00001P1", "CX100001P1", "CX200001P1", "BCB00001P1",
        ] {
            let err = v.connect(&part(source), &part("ANT00001P1")).unwrap_err();
            assert!(matches!(err, Rejection::DirectionViolation { .. }), "{source}: {err}");
        }
    }

    #[test]
    fn occupied_slots_reject_duplicates_per_role() {
        let mut v = validator();
        v.connect(&part("ANT00001P1"), &part("LNA00001P1")).unwrap();

        // Source slot of ANT00001P1 is taken.
        let err = v.connect(&part("ANT00001P1"), &part("LNA00002P1")).unwrap_err();
        match err {
            Rejection::AlreadyConnected { part: p, role, partner } => {
                assert_eq!(p, part("ANT00001P1"));
                assert_eq!(role, Role::Source);
                assert_eq!(partner, part("LNA00001P1"));
            }
            other => panic!("expected AlreadyConnected, got {other}"),
        }

        // Target slot of LNA00001P1 is taken.
        let err = v.connect(&part("ANT00002P1"), &part("LNA00001P1")).unwrap_err();
        assert!(matches!(
            err,
            Rejection::AlreadyConnected { role: Role::Target, .. }
        ), "{err}");

        // But LNA00001P1's source slot is still free: occupancy is per role.
        v.connect(&part("LNA00001P1"), &part("CX100001P1")).unwrap();
    }

    #[test]
    fn disconnect_then_reconnect_to_a_new_partner() {
        let mut v = validator();
        v.connect(&part("ANT00001P1"), &part("LNA00001P1")).unwrap();
        let err = v.connect(&part("ANT00001P1"), &part("LNA00002P1")).unwrap_err();
        assert!(matches!(err, Rejection::AlreadyConnected { .. }), "{err}");

        v.disconnect(&part("ANT00001P1"), &part("LNA00001P1")).unwrap();
        let status = v.status_of(&part("ANT00001P1")).unwrap();
        assert!(status.source.is_free());
        let status = v.status_of(&part("LNA00001P1")).unwrap();
        assert!(status.target.is_free());

        // Reconnection after disconnection is always permitted.
        v.connect(&part("ANT00001P1"), &part("LNA00002P1")).unwrap();

        // And the freed partner can be claimed by someone else.
        v.connect(&part("ANT00002P1"), &part("LNA00001P1")).unwrap();
    }

    #[test]
    fn disconnect_requires_the_exact_live_pair() {
        let mut v = validator();

        // Never connected.
        let err = v.disconnect(&part("ANT00001P1"), &part("LNA00001P1")).unwrap_err();
        assert!(matches!(err, Rejection::NotConnected { .. }), "{err}");

        // Connected to a different partner.
        v.connect(&part("ANT00001P1"), &part("LNA00001P1")).unwrap();
        let err = v.disconnect(&part("ANT00001P1"), &part("LNA00002P1")).unwrap_err();
        assert!(matches!(err, Rejection::NotConnected { .. }), "{err}");
    }

    #[test]
    fn drifted_ledger_is_rejected_not_trusted() {
        // Hand-build a drifted history: ANT1 -> LNA1 connected, then LNA1's
        // target slot is overwritten by a later ANT2 -> LNA1 connect that
        // never went through validation (a missed disconnect).
        let mut ledger = MemoryLedger::new();
        for (s, t, status) in [
            ("ANT00001P1", "LNA00001P1", ConnectionStatus::Connected),
            ("ANT00002P1", "LNA00001P1", ConnectionStatus::Connected),
        ] {
            let s = part(s);
            let t = part(t);
            let event = ConnectionEvent::now(
                &s,
                PartProfile::infer(&s).unwrap(),
                &t,
                PartProfile::infer(&t).unwrap(),
                status,
            );
            ledger.append(&event).unwrap();
        }

        let mut v = ChainValidator::new(directory(), ledger);
        let err = v.disconnect(&part("ANT00001P1"), &part("LNA00001P1")).unwrap_err();
        match err {
            Rejection::LedgerDrift { part: p, claimed, actual } => {
                assert_eq!(p, part("ANT00001P1"));
                assert_eq!(claimed, part("LNA00001P1"));
                assert_eq!(actual, Some(part("ANT00002P1")));
            }
            other => panic!("expected LedgerDrift, got {other}"),
        }
    }

    #[test]
    fn submit_dispatches_the_closed_request_set() {
        let mut v = validator();
        v.submit(ChainRequest::Connect {
            source: part("ANT00001P1"),
            target: part("LNA00001P1"),
        })
        .unwrap();
        v.submit(ChainRequest::Disconnect {
            source: part("ANT00001P1"),
            target: part("LNA00001P1"),
        })
        .unwrap();
        assert_eq!(v.ledger().len().unwrap(), 2);
    }

    #[test]
    fn history_merges_both_roles_in_sequence_order() {
        let mut v = validator();
        v.connect(&part("ANT00001P1"), &part("LNA00001P1")).unwrap();
        v.connect(&part("LNA00001P1"), &part("CX100001P1")).unwrap();
        v.disconnect(&part("ANT00001P1"), &part("LNA00001P1")).unwrap();

        let history = v.history_of(&part("LNA00001P1")).unwrap();
        assert_eq!(history.len(), 3);
        assert!(history.windows(2).all(|w| w[0].seq < w[1].seq));
    }

    #[test]
    fn status_of_unknown_part_is_rejected() {
        let v = validator();
        let err = v.status_of(&part("ANT99999P1")).unwrap_err();
        assert!(matches!(err, Rejection::UnknownPart { .. }), "{err}");
    }

    #[test]
    fn rejections_leave_the_ledger_unchanged() {
        let mut v = validator();
        v.connect(&part("ANT00001P1"), &part("LNA00001P1")).unwrap();
        let before = v.ledger().len().unwrap();

        let _ = v.connect(&part("ANT00001P1"), &part("LNA00002P1"));
        let _ = v.connect(&part("ANT00002P1"), &part("CX100001P1"));
        let _ = v.disconnect(&part("ANT00002P1"), &part("LNA00002P1"));

        assert_eq!(v.ledger().len().unwrap(), before);
    }
}

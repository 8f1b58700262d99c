//! Per-part lock table scoping exclusive access to the parts involved in a
//! validate-then-append sequence.
//!
//! Claims are all-or-nothing for the pair and always taken in canonical
//! (sorted) order, so two callers contending for overlapping pairs cannot
//! deadlock. Waiting is bounded: when the wait is exhausted the caller gets
//! [`Rejection::Busy`] and may retry.

use std::thread;
use std::time::{Duration, Instant};

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use rigchain_core::part::PartNumber;

use crate::reject::Rejection;

/// Default bound on how long a claim waits before reporting Busy.
pub const DEFAULT_CLAIM_WAIT: Duration = Duration::from_millis(200);

const RETRY_INTERVAL: Duration = Duration::from_millis(2);

/// Table of currently claimed parts.
pub struct PartLockTable {
    held: DashMap<PartNumber, ()>,
    wait: Duration,
}

impl PartLockTable {
    pub fn new(wait: Duration) -> PartLockTable {
        PartLockTable {
            held: DashMap::new(),
            wait,
        }
    }

    pub fn with_default_wait() -> PartLockTable {
        Self::new(DEFAULT_CLAIM_WAIT)
    }

    /// Claims both parts, waiting up to the configured bound.
    ///
    /// The claim is released when the returned guard drops.
    pub fn claim_pair(
        &self,
        a: &PartNumber,
        b: &PartNumber,
    ) -> Result<PairClaim<'_>, Rejection> {
        let (first, second) = if a <= b { (a, b) } else { (b, a) };
        let deadline = Instant::now() + self.wait;

        loop {
            if self.try_claim(first) {
                if first == second || self.try_claim(second) {
                    let mut parts = vec![first.clone()];
                    if first != second {
                        parts.push(second.clone());
                    }
                    return Ok(PairClaim {
                        table: &self.held,
                        parts,
                    });
                }
                // Back off fully rather than holding one side while waiting
                // for the other.
                self.held.remove(first);
            }

            if Instant::now() >= deadline {
                return Err(Rejection::Busy);
            }
            thread::sleep(RETRY_INTERVAL);
        }
    }

    fn try_claim(&self, part: &PartNumber) -> bool {
        match self.held.entry(part.clone()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(vacant) => {
                vacant.insert(());
                true
            }
        }
    }
}

/// Guard over a claimed pair; releases both parts on drop.
#[derive(Debug)]
pub struct PairClaim<'a> {
    table: &'a DashMap<PartNumber, ()>,
    parts: Vec<PartNumber>,
}

impl Drop for PairClaim<'_> {
    fn drop(&mut self) {
        for part in &self.parts {
            self.table.remove(part);
        }
    }
}

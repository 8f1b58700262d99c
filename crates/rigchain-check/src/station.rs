//! [`ChainStation`]: the shared, thread-safe handle over one validator.
//!
//! Connect/disconnect requests typically arrive serially from one operator
//! session, but the ledger must tolerate concurrent callers (e.g. a CLI
//! session and a web session against the same store) without producing two
//! conflicting Connected edges for the same part-role slot. The station
//! guarantees this by making validate-then-append a single atomic unit: the
//! two parts involved are claimed in the [`PartLockTable`] for the duration,
//! and the validator itself sits behind a mutex (the SQLite connection is
//! not `Sync`). Every wait is bounded; an exhausted wait reports
//! [`Rejection::Busy`] and the caller may retry.

use std::sync::{Mutex, MutexGuard, TryLockError};
use std::thread;
use std::time::{Duration, Instant};

use rigchain_core::directory::PartDirectory;
use rigchain_core::part::PartNumber;
use rigchain_storage::{EventLedger, EventSeq, LedgerEntry};

use crate::chain::Chain;
use crate::locks::{PartLockTable, DEFAULT_CLAIM_WAIT};
use crate::occupancy::PartStatus;
use crate::reject::Rejection;
use crate::validator::{ChainRequest, ChainValidator};

const LOCK_RETRY_INTERVAL: Duration = Duration::from_millis(2);

/// Shared handle over one directory + ledger pair.
///
/// All methods take `&self`; the station may be wrapped in an `Arc` and
/// shared freely across threads.
pub struct ChainStation<D, L> {
    inner: Mutex<ChainValidator<D, L>>,
    locks: PartLockTable,
    wait: Duration,
}

impl<D: PartDirectory, L: EventLedger> ChainStation<D, L> {
    pub fn new(directory: D, ledger: L) -> ChainStation<D, L> {
        Self::with_lock_wait(directory, ledger, DEFAULT_CLAIM_WAIT)
    }

    /// Builds a station with an explicit bound on lock waiting.
    pub fn with_lock_wait(directory: D, ledger: L, wait: Duration) -> ChainStation<D, L> {
        ChainStation {
            inner: Mutex::new(ChainValidator::new(directory, ledger)),
            locks: PartLockTable::new(wait),
            wait,
        }
    }

    /// Validates and records a connection. See [`ChainValidator::connect`].
    pub fn connect(
        &self,
        source: &PartNumber,
        target: &PartNumber,
    ) -> Result<EventSeq, Rejection> {
        let _claim = self.locks.claim_pair(source, target)?;
        self.validator()?.connect(source, target)
    }

    /// Validates and records a disconnection. See
    /// [`ChainValidator::disconnect`].
    pub fn disconnect(
        &self,
        source: &PartNumber,
        target: &PartNumber,
    ) -> Result<EventSeq, Rejection> {
        let _claim = self.locks.claim_pair(source, target)?;
        self.validator()?.disconnect(source, target)
    }

    /// Dispatches a request from the closed request set.
    pub fn submit(&self, request: ChainRequest) -> Result<EventSeq, Rejection> {
        match request {
            ChainRequest::Connect { source, target } => self.connect(&source, &target),
            ChainRequest::Disconnect { source, target } => self.disconnect(&source, &target),
        }
    }

    /// Current occupancy of both role slots of a part.
    pub fn status_of(&self, part: &PartNumber) -> Result<PartStatus, Rejection> {
        self.validator()?.status_of(part)
    }

    /// Full event history of a part, both roles, in sequence order.
    pub fn history_of(&self, part: &PartNumber) -> Result<Vec<LedgerEntry>, Rejection> {
        Ok(self.validator()?.history_of(part)?)
    }

    /// Reconstructs the chain through a part.
    pub fn trace_chain(&self, part: &PartNumber) -> Result<Chain, Rejection> {
        self.validator()?.trace_chain(part)
    }

    /// Acquires the validator with a bounded wait.
    fn validator(&self) -> Result<MutexGuard<'_, ChainValidator<D, L>>, Rejection> {
        let deadline = Instant::now() + self.wait;
        loop {
            match self.inner.try_lock() {
                Ok(guard) => return Ok(guard),
                // A poisoned mutex only means another caller panicked
                // mid-request; the ledger itself is transactional and stays
                // consistent.
                Err(TryLockError::Poisoned(poisoned)) => return Ok(poisoned.into_inner()),
                Err(TryLockError::WouldBlock) => {
                    if Instant::now() >= deadline {
                        return Err(Rejection::Busy);
                    }
                    thread::sleep(LOCK_RETRY_INTERVAL);
                }
            }
        }
    }
}

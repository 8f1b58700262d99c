//! Storage error types for rigchain-storage.
//!
//! [`StorageError`] covers all anticipated failure modes in the ledger
//! layer. `Busy` is deliberately split out of the generic SQLite error so the
//! validation layer can treat contention as retryable while every other
//! storage failure stays fatal to the request.

use thiserror::Error;

/// Errors produced by ledger operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The underlying store is locked by a concurrent caller. Retryable.
    #[error("ledger busy: concurrent access contention")]
    Busy,

    /// A schema migration failed to apply.
    #[error("migration error: {0}")]
    Migration(String),

    /// A stored row could not be decoded back into the event model.
    #[error("corrupt ledger row: {reason}")]
    Corrupt { reason: String },

    /// Any other SQLite failure.
    #[error("sqlite error: {0}")]
    Sqlite(rusqlite::Error),
}

impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        // SQLITE_BUSY / SQLITE_LOCKED surface after the busy timeout expires;
        // both mean another caller holds the write and a retry may succeed.
        if let rusqlite::Error::SqliteFailure(code, _) = &err {
            if matches!(
                code.code,
                rusqlite::ErrorCode::DatabaseBusy | rusqlite::ErrorCode::DatabaseLocked
            ) {
                return StorageError::Busy;
            }
        }
        StorageError::Sqlite(err)
    }
}

//! SQLite implementation of [`EventLedger`].
//!
//! [`SqliteLedger`] persists connection events in a SQLite database with WAL
//! mode, an atomic transaction on every append, and automatic schema
//! migrations. Enums are stored as canonical TEXT, timestamps via rusqlite's
//! `chrono` feature.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row};

use rigchain_core::event::{ConnectionEvent, ConnectionStatus, Role};
use rigchain_core::part::{PartNumber, PartType, Polarization};

use crate::error::StorageError;
use crate::traits::EventLedger;
use crate::types::{EventSeq, LedgerEntry};

const ENTRY_COLUMNS: &str = "seq, source_part, source_type, source_polarization, \
     source_scan_time, target_part, target_type, target_polarization, \
     target_scan_time, status";

/// SQLite-backed implementation of [`EventLedger`].
///
/// Every append is wrapped in a transaction for atomicity: a failed write
/// leaves the ledger unchanged. No update or delete statement exists in this
/// module.
pub struct SqliteLedger {
    conn: Connection,
}

impl SqliteLedger {
    /// Opens (or creates) a SQLite ledger at `path`.
    pub fn new(path: &str) -> Result<Self, StorageError> {
        let conn = crate::schema::open_database(path)?;
        Ok(SqliteLedger { conn })
    }

    /// Opens an in-memory SQLite ledger (for testing).
    pub fn in_memory() -> Result<Self, StorageError> {
        let conn = crate::schema::open_in_memory()?;
        Ok(SqliteLedger { conn })
    }

    // -----------------------------------------------------------------------
    // Internal helpers
    // -----------------------------------------------------------------------

    /// Column holding the part number for the given role.
    fn role_column(role: Role) -> &'static str {
        match role {
            Role::Source => "source_part",
            Role::Target => "target_part",
        }
    }

    /// Decodes one full ledger row (in `ENTRY_COLUMNS` order).
    ///
    /// Enum decoding happens outside the rusqlite closure so that an
    /// unrecognized TEXT value surfaces as [`StorageError::Corrupt`] rather
    /// than masquerading as a driver error.
    fn decode_row(row: &Row<'_>) -> rusqlite::Result<RawEntry> {
        Ok(RawEntry {
            seq: row.get(0)?,
            source_part: row.get(1)?,
            source_type: row.get(2)?,
            source_polarization: row.get(3)?,
            source_scan_time: row.get(4)?,
            target_part: row.get(5)?,
            target_type: row.get(6)?,
            target_polarization: row.get(7)?,
            target_scan_time: row.get(8)?,
            status: row.get(9)?,
        })
    }
}

/// A row as stored, before enum text is decoded.
struct RawEntry {
    seq: i64,
    source_part: String,
    source_type: String,
    source_polarization: String,
    source_scan_time: DateTime<Utc>,
    target_part: String,
    target_type: String,
    target_polarization: String,
    target_scan_time: DateTime<Utc>,
    status: String,
}

impl RawEntry {
    fn into_entry(self) -> Result<LedgerEntry, StorageError> {
        let corrupt = |column: &str, value: &str| StorageError::Corrupt {
            reason: format!("seq {}: bad {} value '{}'", self.seq, column, value),
        };

        let event = ConnectionEvent {
            source_part: PartNumber::new(&self.source_part).map_err(|_| StorageError::Corrupt {
                reason: format!("seq {}: empty source_part", self.seq),
            })?,
            source_type: PartType::parse(&self.source_type)
                .ok_or_else(|| corrupt("source_type", &self.source_type))?,
            source_polarization: Polarization::parse(&self.source_polarization)
                .ok_or_else(|| corrupt("source_polarization", &self.source_polarization))?,
            source_scan_time: self.source_scan_time,
            target_part: PartNumber::new(&self.target_part).map_err(|_| StorageError::Corrupt {
                reason: format!("seq {}: empty target_part", self.seq),
            })?,
            target_type: PartType::parse(&self.target_type)
                .ok_or_else(|| corrupt("target_type", &self.target_type))?,
            target_polarization: Polarization::parse(&self.target_polarization)
                .ok_or_else(|| corrupt("target_polarization", &self.target_polarization))?,
            target_scan_time: self.target_scan_time,
            status: ConnectionStatus::parse(&self.status)
                .ok_or_else(|| corrupt("status", &self.status))?,
        };

        Ok(LedgerEntry {
            seq: EventSeq(self.seq),
            event,
        })
    }
}

impl EventLedger for SqliteLedger {
    fn append(&mut self, event: &ConnectionEvent) -> Result<EventSeq, StorageError> {
        let tx = self.conn.transaction()?;
        tx.execute(
            "INSERT INTO events (source_part, source_type, source_polarization, \
             source_scan_time, target_part, target_type, target_polarization, \
             target_scan_time, status) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                event.source_part.as_str(),
                event.source_type.as_str(),
                event.source_polarization.as_str(),
                event.source_scan_time,
                event.target_part.as_str(),
                event.target_type.as_str(),
                event.target_polarization.as_str(),
                event.target_scan_time,
                event.status.as_str(),
            ],
        )?;
        let seq = tx.last_insert_rowid();
        tx.commit()?;
        Ok(EventSeq(seq))
    }

    fn scan(&self, part: &PartNumber, role: Role) -> Result<Vec<LedgerEntry>, StorageError> {
        let sql = format!(
            "SELECT {} FROM events WHERE {} = ?1 ORDER BY seq",
            ENTRY_COLUMNS,
            Self::role_column(role),
        );
        let mut stmt = self.conn.prepare_cached(&sql)?;
        let rows = stmt.query_map(params![part.as_str()], Self::decode_row)?;
        let mut result = Vec::new();
        for row in rows {
            result.push(row?.into_entry()?);
        }
        Ok(result)
    }

    fn latest(
        &self,
        part: &PartNumber,
        role: Role,
    ) -> Result<Option<LedgerEntry>, StorageError> {
        // Indexed lookup via (part, seq): the index satisfies both the
        // equality and the descending order, so this never scans the table.
        let sql = format!(
            "SELECT {} FROM events WHERE {} = ?1 ORDER BY seq DESC LIMIT 1",
            ENTRY_COLUMNS,
            Self::role_column(role),
        );
        let mut stmt = self.conn.prepare_cached(&sql)?;
        let mut rows = stmt.query_map(params![part.as_str()], Self::decode_row)?;
        match rows.next() {
            Some(row) => Ok(Some(row?.into_entry()?)),
            None => Ok(None),
        }
    }

    fn all(&self) -> Result<Vec<LedgerEntry>, StorageError> {
        let sql = format!("SELECT {} FROM events ORDER BY seq", ENTRY_COLUMNS);
        let mut stmt = self.conn.prepare_cached(&sql)?;
        let rows = stmt.query_map([], Self::decode_row)?;
        let mut result = Vec::new();
        for row in rows {
            result.push(row?.into_entry()?);
        }
        Ok(result)
    }

    fn len(&self) -> Result<usize, StorageError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM events", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

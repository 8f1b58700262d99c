//! Core error types for rigchain-core.
//!
//! Uses `thiserror` for structured, matchable error variants covering the
//! failure modes of the part identity model.

use thiserror::Error;

/// Core errors produced by the rigchain-core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A part number was empty after normalization.
    #[error("empty part number")]
    EmptyPartNumber,

    /// A SNAP identifier did not match the chassis/slot/port encoding.
    #[error("invalid SNAP identifier '{raw}': {reason}")]
    InvalidSnapId { raw: String, reason: String },
}

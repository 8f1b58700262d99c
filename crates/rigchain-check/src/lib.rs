//! Connection lifecycle validation for the hardware chain ledger.
//!
//! This crate is the rule engine sitting between callers and the append-only
//! event ledger. Given a proposed edge (or its removal) it resolves both
//! parts through the part directory, derives their current occupancy from
//! the ledger, applies the topology, direction, and duplicate rules, and on
//! approval appends exactly one new event. Nothing is ever read back and
//! edited; every state transition is a new row.
//!
//! # Modules
//!
//! - [`reject`]: the Rejection taxonomy returned to callers
//! - [`occupancy`]: latest-wins occupancy resolution per (part, role) slot
//! - [`validator`]: ChainValidator and the closed ChainRequest set
//! - [`chain`]: chain reconstruction by following Connected edges
//! - [`locks`]: per-part lock table for concurrent callers
//! - [`station`]: ChainStation, the shared thread-safe handle

pub mod chain;
pub mod locks;
pub mod occupancy;
pub mod reject;
pub mod station;
pub mod validator;

// Re-export key types for ergonomic use.
pub use chain::{Chain, ChainLink};
pub use locks::PartLockTable;
pub use occupancy::{resolve, Occupancy, PartStatus};
pub use reject::Rejection;
pub use station::ChainStation;
pub use validator::{ChainRequest, ChainValidator};

pub mod directory;
pub mod error;
pub mod event;
pub mod part;

// Re-export commonly used types
pub use directory::{InMemoryDirectory, PartDirectory};
pub use error::CoreError;
pub use event::{ConnectionEvent, ConnectionStatus, Role};
pub use part::{PartNumber, PartProfile, PartType, Polarization, SnapId};

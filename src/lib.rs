//! # mirra - One-Directional Folder Mirroring
//!
//! Keeps a replica directory converged with a source directory by polling:
//! every cycle walks both trees, copies new or changed files (change
//! detection by streamed content digest), creates missing directories, and
//! deletes replica entries the source no longer has. The operation log at
//! the replica root (`log.txt`) is the one path the delete phase never
//! touches.

// Module declarations
pub mod config;
pub mod hash;
pub mod logging;
pub mod scheduler;
pub mod sync;
pub mod types;

// Re-export commonly used types
pub use config::Config;
pub use sync::Synchronizer;
pub use types::{CycleStats, EventSink, MirraError, SyncEvent};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

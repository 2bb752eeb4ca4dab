//! Core type definitions for mirra

mod error;
mod event;
mod stats;

pub use error::MirraError;
pub use event::{EventSink, Level, NullSink, SyncEvent};
pub use stats::CycleStats;

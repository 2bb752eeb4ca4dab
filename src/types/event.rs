//! SyncEvent - observable actions emitted while a cycle runs

use super::CycleStats;
use std::fmt;
use std::path::PathBuf;

/// Severity attached to an emitted event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Warning,
    Error,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::Info => write!(f, "INFO"),
            Level::Warning => write!(f, "WARNING"),
            Level::Error => write!(f, "ERROR"),
        }
    }
}

/// Events emitted while synchronizing a source/replica pair.
///
/// Every filesystem mutation (copy, directory creation, deletion) surfaces
/// here, along with cycle boundaries and recoverable failures. Sinks decide
/// how the events are rendered; the sync logic never formats log lines.
#[derive(Debug, Clone)]
pub enum SyncEvent {
    /// Mirroring started for a source/replica pair
    MirrorStarted { source: PathBuf, replica: PathBuf },

    /// A synchronization cycle began
    CycleStarted,

    /// A synchronization cycle finished
    CycleCompleted { stats: CycleStats },

    /// A cycle aborted for a reason other than a missing source
    CycleFailed { message: String },

    /// The replica root itself was created
    ReplicaCreated { path: PathBuf },

    /// A directory was created under the replica root
    DirCreated { path: PathBuf },

    /// A file's bytes were copied from source to replica
    FileCopied { from: PathBuf, to: PathBuf },

    /// A replica file with no source counterpart was removed
    FileDeleted { path: PathBuf },

    /// A replica directory with no source counterpart was removed recursively
    DirDeleted { path: PathBuf },

    /// The source root did not exist; the cycle was skipped
    SourceMissing { path: PathBuf },

    /// A file could not be hashed; it will be re-copied
    DigestUnavailable { path: PathBuf, message: String },

    /// A single entry failed; the cycle continued with the next entry
    EntryFailed {
        action: &'static str,
        path: PathBuf,
        message: String,
    },
}

impl SyncEvent {
    /// Severity level for this event
    pub fn level(&self) -> Level {
        match self {
            SyncEvent::SourceMissing { .. }
            | SyncEvent::EntryFailed { .. }
            | SyncEvent::CycleFailed { .. } => Level::Error,
            SyncEvent::DigestUnavailable { .. } => Level::Warning,
            _ => Level::Info,
        }
    }
}

impl fmt::Display for SyncEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncEvent::MirrorStarted { source, replica } => write!(
                f,
                "Starting folder synchronization: {} -> {}",
                source.display(),
                replica.display()
            ),
            SyncEvent::CycleStarted => write!(f, "Synchronization cycle started"),
            SyncEvent::CycleCompleted { stats } => write!(
                f,
                "Synchronization completed: {} copied, {} folders created, {} deleted, {} failed. Waiting for next cycle...",
                stats.files_copied,
                stats.dirs_created,
                stats.total_deleted(),
                stats.entries_failed
            ),
            SyncEvent::CycleFailed { message } => {
                write!(f, "Synchronization cycle failed: {}", message)
            }
            SyncEvent::ReplicaCreated { path } => {
                write!(f, "Created replica folder: {}", path.display())
            }
            SyncEvent::DirCreated { path } => write!(f, "Created folder: {}", path.display()),
            SyncEvent::FileCopied { from, to } => {
                write!(f, "Copied: {} -> {}", from.display(), to.display())
            }
            SyncEvent::FileDeleted { path } => write!(f, "Deleted: {}", path.display()),
            SyncEvent::DirDeleted { path } => write!(f, "Deleted folder: {}", path.display()),
            SyncEvent::SourceMissing { path } => {
                write!(f, "Source folder does not exist: {}", path.display())
            }
            SyncEvent::DigestUnavailable { path, message } => write!(
                f,
                "Could not hash {}: {}; treating file as changed",
                path.display(),
                message
            ),
            SyncEvent::EntryFailed {
                action,
                path,
                message,
            } => write!(f, "Failed to {} {}: {}", action, path.display(), message),
        }
    }
}

/// Destination for sync events, injected into the synchronizer.
///
/// Implementations must be callable from the single sync thread; no interior
/// locking is required beyond what the sink itself needs.
pub trait EventSink {
    fn emit(&self, event: &SyncEvent);
}

/// Sink that discards every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&self, _event: &SyncEvent) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levels() {
        assert_eq!(SyncEvent::CycleStarted.level(), Level::Info);
        assert_eq!(
            SyncEvent::SourceMissing {
                path: PathBuf::from("/src")
            }
            .level(),
            Level::Error
        );
        assert_eq!(
            SyncEvent::DigestUnavailable {
                path: PathBuf::from("a.txt"),
                message: "gone".to_string()
            }
            .level(),
            Level::Warning
        );
        assert_eq!(
            SyncEvent::EntryFailed {
                action: "copy",
                path: PathBuf::from("a.txt"),
                message: "denied".to_string()
            }
            .level(),
            Level::Error
        );
    }

    #[test]
    fn test_display_copy() {
        let event = SyncEvent::FileCopied {
            from: PathBuf::from("/src/a.txt"),
            to: PathBuf::from("/dst/a.txt"),
        };
        assert_eq!(event.to_string(), "Copied: /src/a.txt -> /dst/a.txt");
    }

    #[test]
    fn test_display_deletes() {
        let file = SyncEvent::FileDeleted {
            path: PathBuf::from("/dst/old.txt"),
        };
        let dir = SyncEvent::DirDeleted {
            path: PathBuf::from("/dst/old"),
        };
        assert_eq!(file.to_string(), "Deleted: /dst/old.txt");
        assert_eq!(dir.to_string(), "Deleted folder: /dst/old");
    }

    #[test]
    fn test_display_cycle_completed() {
        let stats = CycleStats {
            files_copied: 2,
            dirs_created: 1,
            files_deleted: 3,
            dirs_deleted: 1,
            entries_failed: 0,
        };
        let text = SyncEvent::CycleCompleted { stats }.to_string();
        assert!(text.contains("2 copied"));
        assert!(text.contains("1 folders created"));
        assert!(text.contains("4 deleted"));
    }

    #[test]
    fn test_level_display() {
        assert_eq!(Level::Info.to_string(), "INFO");
        assert_eq!(Level::Warning.to_string(), "WARNING");
        assert_eq!(Level::Error.to_string(), "ERROR");
    }
}

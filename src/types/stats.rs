//! CycleStats - per-cycle action counters

/// Counters for the actions performed by one synchronization cycle.
///
/// A converged pair yields all-zero stats; the idempotence guarantee is
/// checked against `is_noop`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleStats {
    /// Files whose bytes were copied (new or changed)
    pub files_copied: u64,

    /// Directories created under the replica root
    pub dirs_created: u64,

    /// Replica files removed
    pub files_deleted: u64,

    /// Replica directories removed (each counts once, contents included)
    pub dirs_deleted: u64,

    /// Entries that failed and were skipped
    pub entries_failed: u64,
}

impl CycleStats {
    /// True when the cycle performed no action at all
    pub fn is_noop(&self) -> bool {
        *self == CycleStats::default()
    }

    /// Total number of deletions (files plus directory roots)
    pub fn total_deleted(&self) -> u64 {
        self.files_deleted + self.dirs_deleted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_noop() {
        assert!(CycleStats::default().is_noop());
    }

    #[test]
    fn test_any_action_is_not_noop() {
        let stats = CycleStats {
            files_copied: 1,
            ..Default::default()
        };
        assert!(!stats.is_noop());

        let stats = CycleStats {
            entries_failed: 1,
            ..Default::default()
        };
        assert!(!stats.is_noop());
    }

    #[test]
    fn test_total_deleted() {
        let stats = CycleStats {
            files_deleted: 2,
            dirs_deleted: 1,
            ..Default::default()
        };
        assert_eq!(stats.total_deleted(), 3);
    }
}

//! Tree differ - the two-phase synchronization cycle
//!
//! One cycle makes the replica's directory set and file contents match the
//! source's: a copy/create phase walks the source and fills in what the
//! replica is missing, then a delete phase walks the replica and removes
//! what the source no longer has. The copy phase always completes in full
//! before the first deletion; a reader of the replica can still observe a
//! transient mix mid-cycle, which is an accepted limitation.

use crate::config::{Config, LOG_FILE_NAME};
use crate::hash::content_differs;
use crate::types::{CycleStats, EventSink, MirraError, SyncEvent};
use std::collections::HashSet;
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

/// Buffer size for streaming file copies
const COPY_BUFFER_SIZE: usize = 128 * 1024;

/// Synchronizes one source/replica pair.
///
/// Holds the two roots plus the sentinel path (the log file at the replica
/// root) that the delete phase must never evaluate. No state survives
/// between cycles; every call re-derives the comparison from a fresh walk.
#[derive(Debug, Clone)]
pub struct Synchronizer {
    source: PathBuf,
    replica: PathBuf,
    sentinel: PathBuf,
}

impl Synchronizer {
    pub fn new(config: &Config) -> Self {
        Self::with_roots(&config.source, &config.replica_root)
    }

    /// Build a synchronizer from raw roots. The sentinel is always
    /// `log.txt` at the replica root, matching where `SyncLogger` writes.
    pub fn with_roots(source: &Path, replica: &Path) -> Self {
        Self {
            source: source.to_path_buf(),
            replica: replica.to_path_buf(),
            sentinel: replica.join(LOG_FILE_NAME),
        }
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn replica(&self) -> &Path {
        &self.replica
    }

    /// Run one full synchronization cycle.
    ///
    /// Returns `MirraError::SourceMissing` (after reporting it through the
    /// sink) when the source root is absent; the replica is left untouched.
    /// A missing replica root is created, not an error. Per-entry IO
    /// failures are reported through the sink and counted in the returned
    /// stats; they never abort the cycle.
    pub fn synchronize(&self, sink: &dyn EventSink) -> Result<CycleStats, MirraError> {
        if !self.source.exists() {
            sink.emit(&SyncEvent::SourceMissing {
                path: self.source.clone(),
            });
            return Err(MirraError::SourceMissing {
                path: self.source.clone(),
            });
        }

        let mut stats = CycleStats::default();

        if !self.replica.exists() {
            fs::create_dir_all(&self.replica)?;
            sink.emit(&SyncEvent::ReplicaCreated {
                path: self.replica.clone(),
            });
        }

        self.copy_phase(&mut stats, sink);
        self.delete_phase(&mut stats, sink);

        Ok(stats)
    }

    /// Walk the source tree; create missing replica directories and copy
    /// files that are absent or whose content digest differs.
    fn copy_phase(&self, stats: &mut CycleStats, sink: &dyn EventSink) {
        // Standard filters off: dotfiles and ignore-file rules must not
        // keep entries out of the mirror.
        let walker = ignore::WalkBuilder::new(&self.source)
            .standard_filters(false)
            .follow_links(false)
            .build();

        for result in walker {
            let entry = match result {
                Ok(entry) => entry,
                Err(e) => {
                    stats.entries_failed += 1;
                    sink.emit(&SyncEvent::EntryFailed {
                        action: "walk",
                        path: self.source.clone(),
                        message: e.to_string(),
                    });
                    continue;
                }
            };

            if entry.depth() == 0 {
                continue; // the root itself
            }

            let file_type = match entry.file_type() {
                Some(ft) => ft,
                None => continue,
            };

            let rel = match entry.path().strip_prefix(&self.source) {
                Ok(p) => p.to_path_buf(),
                Err(_) => continue,
            };
            let dest = self.replica.join(&rel);

            let outcome = if file_type.is_dir() {
                self.mirror_dir(&dest, stats, sink)
            } else if file_type.is_file() || entry.path().is_file() {
                // Symlinked files are mirrored by content, not as links.
                self.mirror_file(entry.path(), &dest, stats, sink)
            } else {
                Ok(()) // sockets, pipes, dangling links: skipped
            };

            if let Err(e) = outcome {
                stats.entries_failed += 1;
                sink.emit(&SyncEvent::EntryFailed {
                    action: if file_type.is_dir() { "create" } else { "copy" },
                    path: entry.path().to_path_buf(),
                    message: e.to_string(),
                });
            }
        }
    }

    /// Ensure `dest` exists as a directory. A file occupying the path is
    /// removed first (type mismatch policy: delete, then recreate).
    fn mirror_dir(
        &self,
        dest: &Path,
        stats: &mut CycleStats,
        sink: &dyn EventSink,
    ) -> Result<(), MirraError> {
        match fs::symlink_metadata(dest) {
            Ok(meta) if meta.is_dir() => return Ok(()),
            Ok(_) => fs::remove_file(dest)?,
            Err(_) => {}
        }

        fs::create_dir_all(dest)?;
        stats.dirs_created += 1;
        sink.emit(&SyncEvent::DirCreated {
            path: dest.to_path_buf(),
        });
        Ok(())
    }

    /// Ensure `dest` holds the same bytes as `src`. Identical files are
    /// skipped silently. A directory occupying the path is removed first.
    /// A file that cannot be hashed is treated as changed and re-copied.
    fn mirror_file(
        &self,
        src: &Path,
        dest: &Path,
        stats: &mut CycleStats,
        sink: &dyn EventSink,
    ) -> Result<(), MirraError> {
        let needs_copy = match fs::symlink_metadata(dest) {
            Err(_) => true,
            Ok(meta) if meta.is_dir() => {
                fs::remove_dir_all(dest)?;
                true
            }
            Ok(_) => match content_differs(src, dest) {
                Ok(differs) => differs,
                Err(MirraError::UnreadableFile { path, source }) => {
                    sink.emit(&SyncEvent::DigestUnavailable {
                        path,
                        message: source.to_string(),
                    });
                    true
                }
                Err(e) => {
                    sink.emit(&SyncEvent::DigestUnavailable {
                        path: dest.to_path_buf(),
                        message: e.to_string(),
                    });
                    true
                }
            },
        };

        if !needs_copy {
            return Ok(());
        }

        copy_file(src, dest)?;
        stats.files_copied += 1;
        sink.emit(&SyncEvent::FileCopied {
            from: src.to_path_buf(),
            to: dest.to_path_buf(),
        });
        Ok(())
    }

    /// Walk the replica tree and remove entries whose mapped source path no
    /// longer exists, skipping the sentinel log file.
    ///
    /// The walk finishes before the first deletion so the walker never
    /// descends into a directory that was just removed; entries covered by
    /// an already-deleted ancestor are skipped instead of re-deleted.
    fn delete_phase(&self, stats: &mut CycleStats, sink: &dyn EventSink) {
        let mut candidates: Vec<(PathBuf, bool)> = Vec::new();

        let walker = ignore::WalkBuilder::new(&self.replica)
            .standard_filters(false)
            .follow_links(false)
            .build();

        for result in walker {
            let entry = match result {
                Ok(entry) => entry,
                Err(e) => {
                    stats.entries_failed += 1;
                    sink.emit(&SyncEvent::EntryFailed {
                        action: "walk",
                        path: self.replica.clone(),
                        message: e.to_string(),
                    });
                    continue;
                }
            };

            if entry.depth() == 0 {
                continue;
            }

            // The sentinel is never evaluated for deletion, even when the
            // source has no corresponding file.
            if entry.path() == self.sentinel {
                continue;
            }

            let rel = match entry.path().strip_prefix(&self.replica) {
                Ok(p) => p,
                Err(_) => continue,
            };

            if !self.source.join(rel).exists() {
                let is_dir = entry
                    .file_type()
                    .map(|ft| ft.is_dir())
                    .unwrap_or(false);
                candidates.push((entry.path().to_path_buf(), is_dir));
            }
        }

        let mut deleted_roots: HashSet<PathBuf> = HashSet::new();

        for (path, is_dir) in candidates {
            if covered_by_deleted_ancestor(&path, &deleted_roots) {
                continue;
            }

            let outcome = if is_dir {
                fs::remove_dir_all(&path)
            } else {
                fs::remove_file(&path)
            };

            match outcome {
                Ok(()) => {
                    if is_dir {
                        deleted_roots.insert(path.clone());
                        stats.dirs_deleted += 1;
                        sink.emit(&SyncEvent::DirDeleted { path });
                    } else {
                        stats.files_deleted += 1;
                        sink.emit(&SyncEvent::FileDeleted { path });
                    }
                }
                Err(e) => {
                    stats.entries_failed += 1;
                    sink.emit(&SyncEvent::EntryFailed {
                        action: "delete",
                        path,
                        message: e.to_string(),
                    });
                }
            }
        }
    }
}

fn covered_by_deleted_ancestor(path: &Path, deleted_roots: &HashSet<PathBuf>) -> bool {
    path.ancestors()
        .skip(1)
        .any(|ancestor| deleted_roots.contains(ancestor))
}

/// Copy a file using the write-then-rename strategy.
///
/// Bytes stream through a fixed buffer into a `.part` sibling, which is
/// fsynced and renamed over the destination. The rename is atomic on POSIX;
/// an interrupted copy leaves only a `.part` file, which the next cycle's
/// delete phase clears out. Permissions and mtime are carried over on a
/// best-effort basis.
///
/// A source that vanishes or becomes unreadable mid-copy yields
/// `MirraError::UnreadableFile`.
pub fn copy_file(src: &Path, dest: &Path) -> Result<u64, MirraError> {
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)?;
    }

    let part_path = part_path_for(dest);

    let mut src_file = File::open(src).map_err(|e| MirraError::UnreadableFile {
        path: src.to_path_buf(),
        source: e,
    })?;
    let mut part_file = File::create(&part_path)?;

    let mut buffer = vec![0u8; COPY_BUFFER_SIZE];
    let mut total_bytes = 0u64;

    loop {
        let bytes_read = src_file
            .read(&mut buffer)
            .map_err(|e| MirraError::UnreadableFile {
                path: src.to_path_buf(),
                source: e,
            })?;

        if bytes_read == 0 {
            break; // EOF
        }

        part_file.write_all(&buffer[0..bytes_read])?;
        total_bytes += bytes_read as u64;
    }

    part_file.sync_all()?;

    // Drop the file handle before rename (required on Windows)
    drop(part_file);

    // Best-effort metadata preservation; a failure here must not fail the copy.
    if let Ok(metadata) = fs::metadata(src) {
        let _ = fs::set_permissions(&part_path, metadata.permissions());
        if let Ok(mtime) = metadata.modified() {
            let _ =
                filetime::set_file_mtime(&part_path, filetime::FileTime::from_system_time(mtime));
        }
    }

    fs::rename(&part_path, dest)?;

    Ok(total_bytes)
}

/// `dest.part` sibling path, appending rather than replacing the extension
/// so `a.txt` and `a.bin` cannot collide on the same temp name.
fn part_path_for(dest: &Path) -> PathBuf {
    let mut name = dest
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("file"));
    name.push(".part");
    dest.with_file_name(name)
}

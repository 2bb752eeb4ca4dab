//! Change detection by content digest
//!
//! Files are compared by a streamed Blake3 digest rather than size/mtime so
//! that content changes which preserve cheap metadata are still caught.

use crate::types::MirraError;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Chunk size for streaming reads. Memory use is bounded by this regardless
/// of file size.
const CHUNK_SIZE: usize = 64 * 1024;

/// Compute the Blake3 digest of a file.
///
/// The file is streamed in fixed-size chunks; a file of any size hashes in
/// constant memory. A file that disappears or becomes unreadable mid-read
/// yields `MirraError::UnreadableFile`.
///
/// # Example
/// ```no_run
/// use mirra::hash::compute_digest;
/// use std::path::Path;
///
/// let digest = compute_digest(Path::new("file.txt"))?;
/// # Ok::<(), mirra::MirraError>(())
/// ```
pub fn compute_digest(file_path: &Path) -> Result<[u8; 32], MirraError> {
    let mut file = File::open(file_path).map_err(|e| MirraError::UnreadableFile {
        path: file_path.to_path_buf(),
        source: e,
    })?;

    let mut hasher = blake3::Hasher::new();
    let mut buffer = vec![0u8; CHUNK_SIZE];

    loop {
        let bytes_read = file
            .read(&mut buffer)
            .map_err(|e| MirraError::UnreadableFile {
                path: file_path.to_path_buf(),
                source: e,
            })?;

        if bytes_read == 0 {
            break; // EOF
        }

        hasher.update(&buffer[0..bytes_read]);
    }

    Ok(*hasher.finalize().as_bytes())
}

/// Decide whether two existing files hold different bytes.
///
/// Both files are digested and the digests compared; collision probability
/// is treated as negligible for mirroring purposes. Callers should treat an
/// `Err` as "differs" so an unreadable file is re-copied rather than
/// silently skipped.
pub fn content_differs(file_a: &Path, file_b: &Path) -> Result<bool, MirraError> {
    Ok(compute_digest(file_a)? != compute_digest(file_b)?)
}

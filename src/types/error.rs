//! Error types for mirra

use std::path::PathBuf;
use thiserror::Error;

/// Error types for mirror operations
#[derive(Debug, Error)]
pub enum MirraError {
    /// Standard IO error (automatically converted via #[from])
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Source root absent at cycle start; the cycle is skipped
    #[error("Source folder does not exist: {path}")]
    SourceMissing { path: PathBuf },

    /// A file vanished or became unreadable mid-read (hashing or copy)
    #[error("File unreadable: {path}: {source}")]
    UnreadableFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl MirraError {
    /// Check if this error means the source root was absent
    pub fn is_source_missing(&self) -> bool {
        matches!(self, MirraError::SourceMissing { .. })
    }

    /// Check if this error is a configuration error
    pub fn is_config_error(&self) -> bool {
        matches!(self, MirraError::Config(_))
    }
}

//! Configuration management

use crate::types::MirraError;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// File name of the operation log kept at the replica root.
///
/// This doubles as the sentinel the deletion phase must never touch: the
/// path logs are written to and the path exempt from deletion are the same
/// by construction.
pub const LOG_FILE_NAME: &str = "log.txt";

/// Command-line arguments
#[derive(Debug, Parser)]
#[command(
    name = "mirra",
    version,
    about = "One-directional folder mirroring tool"
)]
pub struct Cli {
    /// Path to the source folder
    pub source: PathBuf,

    /// Parent folder the replica is created under
    pub replica_parent: PathBuf,

    /// Synchronization interval in seconds
    pub interval: u64,
}

/// Validated runtime configuration for one source/replica pair
#[derive(Debug, Clone)]
pub struct Config {
    /// Source directory (never mutated)
    pub source: PathBuf,

    /// Replica root: `<replica_parent>/<source-name>_copy`
    pub replica_root: PathBuf,

    /// Delay between synchronization cycles
    pub interval: Duration,
}

impl Config {
    /// Absolute path of the sentinel log file at the replica root
    pub fn log_path(&self) -> PathBuf {
        self.replica_root.join(LOG_FILE_NAME)
    }
}

impl TryFrom<Cli> for Config {
    type Error = MirraError;

    /// Validate CLI arguments and derive the replica root.
    ///
    /// The source is NOT required to exist here: a missing source is a
    /// per-cycle recoverable condition, not a startup failure.
    fn try_from(cli: Cli) -> Result<Self, Self::Error> {
        if cli.interval == 0 {
            return Err(MirraError::Config(
                "interval must be at least 1 second".to_string(),
            ));
        }

        let source_name = cli
            .source
            .file_name()
            .ok_or_else(|| {
                MirraError::Config(format!(
                    "Source path has no folder name: {:?}",
                    cli.source
                ))
            })?
            .to_os_string();

        let mut replica_name = source_name;
        replica_name.push("_copy");
        let replica_root = cli.replica_parent.join(replica_name);

        if replica_root == cli.source {
            return Err(MirraError::Config(
                "Source and replica cannot be the same folder".to_string(),
            ));
        }

        Ok(Config {
            source: cli.source,
            replica_root,
            interval: Duration::from_secs(cli.interval),
        })
    }
}

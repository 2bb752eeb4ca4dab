use clap::Parser;
use mirra::config::Cli;
use mirra::logging::SyncLogger;
use mirra::scheduler::{self, CancelToken};
use mirra::{Config, Synchronizer};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Convert CLI args to Config - this validates immediately
    let config = Config::try_from(cli)?;

    // The log file lives inside the replica, so the replica root must exist
    // before the logger opens it.
    std::fs::create_dir_all(&config.replica_root)?;
    let logger = SyncLogger::create(&config.log_path())?;

    let sync = Synchronizer::new(&config);

    // Runs until the process is terminated externally.
    let token = CancelToken::new();
    scheduler::run_loop(&sync, &logger, config.interval, &token);

    Ok(())
}

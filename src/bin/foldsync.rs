//! Foldsync CLI binary
//!
//! Thin glue around the library: parses arguments, initializes logging, and
//! invokes one reconciliation pass at a fixed interval, forever. All
//! non-trivial work happens in the library crate.

use anyhow::{bail, Context, Result};
use clap::Parser;
use foldsync::config::SyncConfig;
use foldsync::error::SyncError;
use foldsync::logging::init_logging;
use foldsync::orchestrate::{run_once, PassResult};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;
use tracing::{error, info, warn};

#[derive(Parser, Debug)]
#[command(
    name = "foldsync",
    version,
    about = "One-way periodic directory tree synchronization"
)]
struct Cli {
    /// Source folder treated as ground truth
    source: Option<PathBuf>,

    /// Replica folder kept in sync with the source
    replica: Option<PathBuf>,

    /// Seconds between synchronization passes
    #[arg(short, long)]
    interval: Option<u64>,

    /// Log file receiving a copy of the console output
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Log level: trace, debug, info, warn, error
    #[arg(long)]
    log_level: Option<String>,

    /// TOML config file supplying defaults for the arguments above
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = resolve_config(&cli)?;

    init_logging(&config.log_level, config.log_file.as_deref())
        .context("Failed to initialize logging")?;

    // Resolve the source eagerly so a mistyped path fails at startup instead
    // of looking like an endlessly failing sync.
    let source = dunce::canonicalize(&config.source)
        .with_context(|| format!("Source folder not found: {:?}", config.source))?;
    let replica = config.replica.clone();

    info!(
        "Starting synchronization: {} -> {} every {}s",
        source.display(),
        replica.display(),
        config.interval_secs
    );

    loop {
        match run_once(&source, &replica) {
            Ok(result) => report(&result, &source, &replica),
            Err(e @ SyncError::SourceMissing(_)) => {
                // The source may reappear (unmounted share, etc.); the next
                // scheduled pass is the retry.
                error!("Pass aborted: {}", e);
            }
            Err(e) => error!("Pass failed: {}", e),
        }
        thread::sleep(Duration::from_secs(config.interval_secs));
    }
}

/// Merge CLI flags over the optional config file, flags winning
fn resolve_config(cli: &Cli) -> Result<SyncConfig> {
    let mut config = match &cli.config {
        Some(path) => SyncConfig::load(path)?,
        None => {
            let (Some(source), Some(replica)) = (&cli.source, &cli.replica) else {
                bail!("source and replica are required unless --config is given");
            };
            SyncConfig {
                source: source.clone(),
                replica: replica.clone(),
                interval_secs: 30,
                log_file: None,
                log_level: "info".to_string(),
            }
        }
    };

    if let Some(source) = &cli.source {
        config.source = source.clone();
    }
    if let Some(replica) = &cli.replica {
        config.replica = replica.clone();
    }
    if let Some(interval) = cli.interval {
        config.interval_secs = interval;
    }
    if let Some(log_file) = &cli.log_file {
        config.log_file = Some(log_file.clone());
    }
    if let Some(log_level) = &cli.log_level {
        config.log_level = log_level.clone();
    }

    if config.interval_secs == 0 {
        bail!("interval must be at least 1 second");
    }

    Ok(config)
}

/// Format one line per action outcome plus a pass-completion line
fn report(result: &PassResult, source: &Path, replica: &Path) {
    for outcome in &result.outcomes {
        let line = outcome.describe(source, replica);
        if outcome.succeeded {
            info!("{}", line);
        } else {
            warn!("{}", line);
        }
    }

    if result.is_noop() {
        info!(
            "--- Synchronization pass at {}: nothing to do ---",
            result.completed_at.format("%Y-%m-%d %H:%M:%S")
        );
    } else {
        info!(
            "--- Synchronization pass at {}: {} actions, {} failed ---",
            result.completed_at.format("%Y-%m-%d %H:%M:%S"),
            result.outcomes.len(),
            result.failed()
        );
    }
}

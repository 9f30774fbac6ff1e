// src/lib.rs

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod logging;
pub mod types;
pub mod watch;

use std::sync::Arc;

use anyhow::Result;
use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::{WatchConfig, resolve_config, validate_root};
use crate::engine::FileWatcher;
use crate::exec::CommandRunner;
use crate::fs::{FileSystem, RealFileSystem};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config resolution (CLI flags over optional config file over defaults)
/// - the command runner
/// - the watching engine
/// - Ctrl-C handling
pub async fn run(args: CliArgs) -> Result<()> {
    let config = resolve_config(args.config.as_deref(), args.overrides())?;

    let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);
    validate_root(&config, fs.as_ref())?;

    let action = CommandRunner::new(&config.command)?;
    let watcher = FileWatcher::new(&config, fs, action)?;

    if args.dry_run {
        print_dry_run(&config);
        return Ok(());
    }

    // Ctrl-C → graceful shutdown.
    {
        let cancel = watcher.cancel_token();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                eprintln!("failed to listen for Ctrl+C: {e}");
                return;
            }
            info!("Ctrl+C received; stopping");
            cancel.cancel();
        });
    }

    watcher.run().await?;
    Ok(())
}

/// Simple dry-run output: print the effective configuration.
fn print_dry_run(config: &WatchConfig) {
    println!("filewatcher dry-run");
    println!("  command: {}", config.command);
    println!("  glob: {}", config.glob);
    println!("  root: {}", config.root.display());
    println!("  check_interval: {:?}", config.check_interval);
    println!("  run_interval: {:?}", config.run_interval);
    match config.max_watchers {
        Some(max) => println!("  max_watchers: {max}"),
        None => println!("  max_watchers: unbounded"),
    }
    println!("  overlap: {}", config.overlap);
    println!("  signal_capacity: {}", config.signal_capacity);

    debug!("dry-run complete (no watching)");
}

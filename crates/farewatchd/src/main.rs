//! farewatch daemon - runs price checks on the configured interval

use anyhow::Result;
use clap::Parser;
use farewatch_core::{constants, Config};
use std::path::PathBuf;
use tracing::{error, info};

mod daemon;
mod logging;

use daemon::Daemon;

#[derive(Parser, Debug)]
#[command(name = "farewatchd")]
#[command(author, version, about = "farewatch daemon - scheduled flight price checks")]
struct Args {
    /// Config file (default: ~/.farewatch/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Run a single check cycle and exit
    #[arg(long)]
    once: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // A .env file is optional; real environment variables win
    dotenvy::dotenv().ok();

    let _log_guard = logging::init(&constants::logs_dir())?;

    info!("farewatch daemon starting...");

    let config_path = args.config.unwrap_or_else(constants::config_path);
    info!("Using config file {}", config_path.display());
    let config = Config::load(Some(config_path.as_path()))?;

    let home = constants::farewatch_home();
    if !home.exists() {
        std::fs::create_dir_all(&home)?;
        info!("Created farewatch home directory: {}", home.display());
    }

    let daemon = Daemon::new(&config).await?;

    if args.once {
        let report = daemon.run_once().await?;
        info!("Single check finished: {}", report);
        return Ok(());
    }

    let mut sigterm = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())?;
    let mut sigint = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::interrupt())?;

    tokio::select! {
        _ = daemon.run() => {
            error!("Scheduler stopped unexpectedly");
        }
        _ = sigterm.recv() => {
            info!("Received SIGTERM, shutting down...");
        }
        _ = sigint.recv() => {
            info!("Received SIGINT, shutting down...");
        }
    }

    info!("Daemon shutdown complete");
    Ok(())
}

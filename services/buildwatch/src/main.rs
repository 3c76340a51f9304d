//! Buildwatch CLI
//!
//! Command-line interface for the CI build status monitor.

use std::path::PathBuf;

use buildwatch::{load_config, Config};
use clap::Parser;
use tracing::Level;

#[derive(Parser)]
#[command(name = "buildwatch")]
#[command(about = "Watch the latest CI build and post status changes to a chat webhook")]
#[command(version)]
struct Args {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Polling interval in seconds (overrides config file)
    #[arg(long)]
    interval: Option<u64>,

    /// Project checkout to query builds for (overrides config file)
    #[arg(long)]
    working_dir: Option<PathBuf>,

    /// Log level
    #[arg(short, long, default_value = "info")]
    log_level: Level,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(args.log_level)
        .init();

    tracing::debug!(
        "Parsed command line arguments: config={:?}, interval={:?}, working_dir={:?}, log_level={:?}",
        args.config,
        args.interval,
        args.working_dir,
        args.log_level
    );

    let mut config = if let Some(config_path) = &args.config {
        tracing::debug!("Loading configuration from {:?}", config_path);
        load_config(config_path)?
    } else {
        tracing::debug!("Using default configuration");
        Config::default()
    };

    if let Some(interval) = args.interval {
        config.polling_interval_seconds = interval;
    }
    if let Some(working_dir) = args.working_dir {
        config.provider.set_working_dir(working_dir);
    }

    config.resolve_secrets()?;

    tracing::info!("Starting buildwatch");
    buildwatch::run(config).await?;

    Ok(())
}

//! mediaops command-line entry point
//!
//! # Usage
//!
//! ```bash
//! mediaops probe --input clip.mp4
//! mediaops cut --input clip.mp4 --from 00:00:02 --to 00:00:05 --output part.mp4
//! mediaops convert --input song.wav --kind audio --extension flac
//! mediaops --dry-run convert --input clip.mp4 --output clip.mkv
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use media_ops::adapters::TomlConfigAdapter;
use media_ops::app::DefaultAppContainer;
use media_ops::cli::{commands, Cli};
use media_ops::config_initialization::initialize_configuration_hierarchy;
use media_ops::utils::logging::init_logging;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = TomlConfigAdapter::new();
    let settings = initialize_configuration_hierarchy(&config, &cli.config_overrides())
        .await
        .context("Failed to load configuration")?;

    init_logging(settings.log_level, settings.log_format);
    info!(dry_run = cli.dry_run, "Starting mediaops");

    let container = if cli.dry_run {
        DefaultAppContainer::dry_run(&settings)
    } else {
        DefaultAppContainer::new(&settings)
    };

    commands::execute(&container, cli.command).await
}

//! CLI module for mediaops
//!
//! This module handles command-line argument parsing and command execution.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config_initialization::ConfigOverrides;

pub mod args;
pub mod commands;

pub use args::{ConvertArgs, CutArgs, ProbeArgs};

/// Probe, cut and convert media files through ffmpeg
#[derive(Parser, Debug)]
#[command(name = "mediaops")]
#[command(about = "Probe, cut and convert media files through ffmpeg")]
#[command(version)]
#[command(long_about = None)]
pub struct Cli {
    /// Configuration file (TOML with a [mediaops] table)
    #[arg(long, global = true, env = "MEDIAOPS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Logging level
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Log output format (pretty or json)
    #[arg(long, global = true)]
    pub log_format: Option<String>,

    /// Print the ffmpeg command instead of running it
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn config_overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            config_file: self.config.clone(),
            log_level: self.log_level.clone(),
            log_format: self.log_format.clone(),
        }
    }
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print media details as JSON
    Probe(ProbeArgs),
    /// Copy a time range out of a media file
    Cut(CutArgs),
    /// Re-encode a media file into another format
    Convert(ConvertArgs),
    /// Remove every file from the cache directory
    PurgeCache,
}

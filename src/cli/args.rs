//! Command-line argument definitions

use clap::Args;

use crate::domain::model::MediaKind;

/// Arguments for the probe command
#[derive(Args, Debug)]
pub struct ProbeArgs {
    /// Input media file path
    #[arg(short, long)]
    pub input: String,

    /// Media kind of the input (audio or video)
    #[arg(short, long, default_value = "video")]
    pub kind: MediaKind,

    /// Probe again even if details are cached
    #[arg(long)]
    pub force: bool,
}

/// Arguments for the cut command
#[derive(Args, Debug)]
pub struct CutArgs {
    /// Input media file path
    #[arg(short, long)]
    pub input: String,

    /// Media kind of the input (audio or video)
    #[arg(short, long, default_value = "video")]
    pub kind: MediaKind,

    /// Start time (HH:MM:SS[.mmm])
    #[arg(short, long)]
    pub from: String,

    /// End time (HH:MM:SS[.mmm])
    #[arg(short, long)]
    pub to: String,

    /// Output file path (default: allocated in the cache directory)
    #[arg(short, long)]
    pub output: Option<String>,
}

/// Arguments for the convert command
#[derive(Args, Debug)]
pub struct ConvertArgs {
    /// Input media file path
    #[arg(short, long)]
    pub input: String,

    /// Media kind of the input (audio or video)
    #[arg(short, long, default_value = "video")]
    pub kind: MediaKind,

    /// Target format (default: mp4 for video, mp3 for audio)
    #[arg(short, long)]
    pub extension: Option<String>,

    /// Output file path (default: allocated in the cache directory)
    #[arg(short, long)]
    pub output: Option<String>,
}

//! mediaops
//!
//! Probe, cut and convert audio and video files by driving `ffmpeg` and
//! `ffprobe`, with option validation, cached media details and output paths
//! allocated from a cache directory.

pub mod adapters;
pub mod app;
pub mod cli;
pub mod config_initialization;
pub mod domain;
pub mod ports;
pub mod utils;

// Re-export commonly used types
pub use app::{AllocationPolicy, DefaultAppContainer, MediaEngine};
pub use domain::errors::{ErrorKind, MediaError, MediaResult};
pub use domain::model::{
    MediaDetails, MediaHandle, MediaKind, OperationOptions, OperationOutput, OptionValue,
};
pub use domain::rules::OptionValidator;
pub use utils::{PathUtils, TimeCodec};

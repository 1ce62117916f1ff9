// Adapters - External system implementations

pub mod cache_fs;
pub mod exec_ffmpeg;
pub mod mock;
pub mod probe_ffprobe;
pub mod toml_config;

// Re-export adapters
pub use cache_fs::CacheDirAdapter;
pub use exec_ffmpeg::FfmpegExecAdapter;
pub use mock::{MockCacheAdapter, MockExecuteAdapter, MockProbeAdapter};
pub use probe_ffprobe::FfprobeAdapter;
pub use toml_config::TomlConfigAdapter;

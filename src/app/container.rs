use std::sync::Arc;

use crate::adapters::{CacheDirAdapter, FfmpegExecAdapter, FfprobeAdapter, MockExecuteAdapter};
use crate::app::media_engine::MediaEngine;
use crate::app::path_resolver::AllocationPolicy;
use crate::config_initialization::EngineSettings;
use crate::ports::{CachePort, ExecutePort, ProbePort};

pub trait AppContainer: Send + Sync {
    fn media_engine(&self) -> Arc<MediaEngine>;
}

pub struct DefaultAppContainer {
    media_engine: Arc<MediaEngine>,
    cache_adapter: Arc<CacheDirAdapter>,
    dry_run_executor: Option<Arc<MockExecuteAdapter>>,
}

impl DefaultAppContainer {
    /// Wire the engine to ffmpeg, ffprobe and the cache directory
    pub fn new(settings: &EngineSettings) -> Self {
        let execute_port = Arc::new(FfmpegExecAdapter::new(settings.ffmpeg_binary.clone()));
        Self::build(settings, execute_port as Arc<dyn ExecutePort>, None)
    }

    /// Same wiring, but commands are recorded instead of run
    pub fn dry_run(settings: &EngineSettings) -> Self {
        let executor = Arc::new(MockExecuteAdapter::new());
        Self::build(
            settings,
            Arc::clone(&executor) as Arc<dyn ExecutePort>,
            Some(executor),
        )
    }

    fn build(
        settings: &EngineSettings,
        execute_port: Arc<dyn ExecutePort>,
        dry_run_executor: Option<Arc<MockExecuteAdapter>>,
    ) -> Self {
        let probe_port = Arc::new(FfprobeAdapter::new(settings.ffprobe_binary.clone()));
        let cache_adapter = Arc::new(CacheDirAdapter::new(settings.cache_dir.clone()));

        let media_engine = Arc::new(MediaEngine::new(
            execute_port,
            probe_port as Arc<dyn ProbePort>,
            Arc::clone(&cache_adapter) as Arc<dyn CachePort>,
            AllocationPolicy::from_flag(settings.allow_cache_allocation),
        ));

        Self {
            media_engine,
            cache_adapter,
            dry_run_executor,
        }
    }

    pub fn cache_adapter(&self) -> Arc<CacheDirAdapter> {
        Arc::clone(&self.cache_adapter)
    }

    /// Commands captured in dry-run mode, `None` when running for real
    pub fn recorded_commands(&self) -> Option<Vec<String>> {
        self.dry_run_executor.as_ref().map(|executor| executor.commands())
    }
}

impl AppContainer for DefaultAppContainer {
    fn media_engine(&self) -> Arc<MediaEngine> {
        Arc::clone(&self.media_engine)
    }
}

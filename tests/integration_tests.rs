use std::path::Path;
use std::sync::Arc;

use media_ops::adapters::*;
use media_ops::app::path_resolver::AllocationPolicy;
use media_ops::ports::*;
use media_ops::*;
use tempfile::TempDir;

/// Test utilities for media processing
mod test_utils {
    use super::*;

    /// Whether ffmpeg and ffprobe can be run on this machine
    pub fn ffmpeg_available() -> bool {
        ["ffmpeg", "ffprobe"].iter().all(|binary| {
            std::process::Command::new(binary)
                .arg("-version")
                .output()
                .map(|output| output.status.success())
                .unwrap_or(false)
        })
    }

    /// Create a test video file using FFmpeg
    pub fn create_test_video(output_path: &Path, seconds: u32) {
        let status = std::process::Command::new("ffmpeg")
            .args([
                "-hide_banner",
                "-loglevel",
                "error",
                "-f",
                "lavfi",
                "-i",
                &format!("testsrc=duration={}:size=320x240:rate=25", seconds),
                "-c:v",
                "libx264",
                "-y",
            ])
            .arg(output_path)
            .status()
            .expect("Failed to run ffmpeg");
        assert!(status.success(), "ffmpeg could not create test video");
    }

    pub struct Harness {
        pub engine: MediaEngine,
        pub exec: Arc<MockExecuteAdapter>,
        pub probe: Arc<MockProbeAdapter>,
        pub cache: Arc<MockCacheAdapter>,
    }

    pub fn harness(
        probe: MockProbeAdapter,
        cache: MockCacheAdapter,
        exec: MockExecuteAdapter,
    ) -> Harness {
        let exec = Arc::new(exec);
        let probe = Arc::new(probe);
        let cache = Arc::new(cache);
        let engine = MediaEngine::new(
            Arc::clone(&exec) as Arc<dyn ExecutePort>,
            Arc::clone(&probe) as Arc<dyn ProbePort>,
            Arc::clone(&cache) as Arc<dyn CachePort>,
            AllocationPolicy::Enabled,
        );
        Harness {
            engine,
            exec,
            probe,
            cache,
        }
    }
}

use test_utils::*;

#[tokio::test]
async fn test_trim_dispatches_copy_command_with_length() {
    let h = harness(
        MockProbeAdapter::video(10_000, 4_096, 640, 360),
        MockCacheAdapter::with_path("/cache/media-1.mp4"),
        MockExecuteAdapter::new(),
    );
    let mut handle = MediaHandle::new("in.mp4", MediaKind::Video);
    let options = OperationOptions::new()
        .with("from", "00:00:02")
        .with("to", "00:00:05");

    let output = h.engine.trim(&mut handle, &options).await.unwrap();

    assert_eq!(output.output_file_path, "/cache/media-1.mp4");
    assert_eq!(output.return_code, 0);
    assert_eq!(h.cache.requested_extensions(), vec!["mp4".to_string()]);
    assert_eq!(
        h.exec.commands(),
        vec![
            "-ss 00:00:02.000 -i \"in.mp4\" -t 00:00:03.000 -c copy \"/cache/media-1.mp4\""
                .to_string()
        ]
    );
}

#[tokio::test]
async fn test_trim_past_duration_never_allocates() {
    let h = harness(
        MockProbeAdapter::video(10_000, 4_096, 640, 360),
        MockCacheAdapter::with_path("/cache/media-1.mp4"),
        MockExecuteAdapter::new(),
    );
    let mut handle = MediaHandle::new("in.mp4", MediaKind::Video);
    let options = OperationOptions::new()
        .with("from", "00:00:02")
        .with("to", "00:00:11");

    let err = h.engine.trim(&mut handle, &options).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::DurationBounds);
    assert!(h.cache.requested_extensions().is_empty());
    assert!(h.exec.commands().is_empty());
}

#[tokio::test]
async fn test_convert_without_allocated_path_fails_before_execution() {
    let h = harness(
        MockProbeAdapter::audio(60_000, 1_024),
        MockCacheAdapter::empty(),
        MockExecuteAdapter::new(),
    );
    let mut handle = MediaHandle::new("song.wav", MediaKind::Audio);
    let options = OperationOptions::new().with("extension", "mp3");

    let err = h.engine.convert(&mut handle, Some(&options)).await.unwrap_err();

    assert!(matches!(err, MediaError::OutputAllocation));
    assert_eq!(h.cache.requested_extensions(), vec!["mp3".to_string()]);
    assert!(h.exec.commands().is_empty());
}

#[tokio::test]
async fn test_convert_with_explicit_output_skips_allocator() {
    let h = harness(
        MockProbeAdapter::video(10_000, 4_096, 640, 360),
        MockCacheAdapter::failing("disk full"),
        MockExecuteAdapter::new(),
    );
    let mut handle = MediaHandle::new("/media/My Clip.MOV", MediaKind::Video);
    let options = OperationOptions::new()
        .with("extension", "mkv")
        .with("outputFilePath", "/out/clip.mkv");

    let output = h.engine.convert(&mut handle, Some(&options)).await.unwrap();

    assert_eq!(output.output_file_path, "/out/clip.mkv");
    assert!(h.cache.requested_extensions().is_empty());
    assert_eq!(
        h.exec.commands(),
        vec!["-i \"/media/My Clip.MOV\" \"/out/clip.mkv\"".to_string()]
    );
}

#[tokio::test]
async fn test_probe_is_cached_until_forced() {
    let h = harness(
        MockProbeAdapter::video(10_000, 4_096, 640, 360),
        MockCacheAdapter::empty(),
        MockExecuteAdapter::new(),
    );
    let mut handle = MediaHandle::new("in.mp4", MediaKind::Video);

    let first = h.engine.probe(&mut handle, false).await.unwrap();
    let second = h.engine.probe(&mut handle, false).await.unwrap();
    assert_eq!(first, second);
    assert_eq!(h.probe.full_info_count(), 1);

    h.probe.set_duration_ms(12_000);
    let cached = h.engine.probe(&mut handle, false).await.unwrap();
    assert_eq!(cached.duration_ms(), 10_000);

    let refreshed = h.engine.probe(&mut handle, true).await.unwrap();
    assert_eq!(refreshed.duration_ms(), 12_000);
    assert_eq!(h.probe.full_info_count(), 2);
    assert_eq!(handle.cached_details(), Some(&refreshed));
}

#[tokio::test]
async fn test_changing_path_drops_cached_details() {
    let h = harness(
        MockProbeAdapter::audio(5_000, 512),
        MockCacheAdapter::empty(),
        MockExecuteAdapter::new(),
    );
    let mut handle = MediaHandle::new("a.mp3", MediaKind::Audio);
    h.engine.probe(&mut handle, false).await.unwrap();

    handle.set_full_path("b.flac");
    assert!(handle.cached_details().is_none());
    assert_eq!(handle.extension(), Some("flac"));

    let details = h.engine.probe(&mut handle, false).await.unwrap();
    assert_eq!(details.extension(), "flac");
    assert_eq!(h.probe.full_info_count(), 2);
}

#[tokio::test]
async fn test_non_zero_return_code_is_execution_error() {
    let h = harness(
        MockProbeAdapter::video(10_000, 4_096, 640, 360),
        MockCacheAdapter::with_path("/cache/out.mp4"),
        MockExecuteAdapter::with_return_code(1),
    );
    let mut handle = MediaHandle::new("in.avi", MediaKind::Video);

    let err = h.engine.convert(&mut handle, None).await.unwrap_err();

    assert!(matches!(err, MediaError::Execution { return_code: 1, .. }));
    assert_eq!(h.cache.requested_extensions(), vec!["mp4".to_string()]);
}

#[tokio::test]
async fn test_cancel_reaches_executor() {
    let h = harness(
        MockProbeAdapter::video(10_000, 4_096, 640, 360),
        MockCacheAdapter::empty(),
        MockExecuteAdapter::new(),
    );
    h.engine.cancel();
    h.engine.cancel();
    assert_eq!(h.exec.cancel_count(), 2);
}

#[tokio::test]
async fn test_options_from_json_feed_the_engine() {
    let h = harness(
        MockProbeAdapter::video(10_000, 4_096, 640, 360),
        MockCacheAdapter::with_path("/cache/out.webm"),
        MockExecuteAdapter::new(),
    );
    let mut handle = MediaHandle::new("in.mp4", MediaKind::Video);

    let bad = OperationOptions::from_json(r#"{"extension": "mp3"}"#).unwrap();
    let err = h.engine.convert(&mut handle, Some(&bad)).await.unwrap_err();
    assert!(matches!(err, MediaError::Options { ref key, .. } if key == "extension"));

    let good = OperationOptions::from_json(r#"{"extension": "WEBM"}"#).unwrap();
    let output = h.engine.convert(&mut handle, Some(&good)).await.unwrap();
    assert_eq!(output.output_file_path, "/cache/out.webm");
}

#[tokio::test]
async fn test_real_ffmpeg_cut() {
    if !ffmpeg_available() {
        println!("Skipping real ffmpeg test - ffmpeg/ffprobe not found");
        return;
    }

    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let input = temp_dir.path().join("input.mp4");
    create_test_video(&input, 3);

    let cache = CacheDirAdapter::new(temp_dir.path().join("cache"));
    let engine = MediaEngine::new(
        Arc::new(FfmpegExecAdapter::new("ffmpeg")),
        Arc::new(FfprobeAdapter::new("ffprobe")),
        Arc::new(cache),
        AllocationPolicy::Enabled,
    );

    let mut handle = MediaHandle::new(input.to_string_lossy(), MediaKind::Video);
    let details = engine.probe(&mut handle, false).await.expect("Failed to probe");
    assert!(details.duration_ms() >= 2_900);
    assert_eq!(details.dimensions(), Some((320, 240)));

    let options = OperationOptions::new()
        .with("from", "00:00:00.500")
        .with("to", "00:00:01.500");
    let output = engine.trim(&mut handle, &options).await.expect("Failed to cut");

    assert!(Path::new(&output.output_file_path).exists());
    assert!(output.output_file_path.ends_with(".mp4"));
}

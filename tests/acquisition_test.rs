//! End-to-end acquisition flows against a scripted yt-dlp stand-in, without touching the network.

use async_trait::async_trait;
use clipfetch::extractor::{ProcessError, ProcessOutput, ProcessRequest, ProcessRunner};
use clipfetch::{AcquisitionError, AcquisitionSettings, CleanupOutcome, Platform, ToolFailure, VideoDownloadService};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;

const YOUTUBE_URL: &str = "https://www.youtube.com/watch?v=abc123";
const METADATA: &str = r#"{"title": "My Talk", "duration": 600, "thumbnail": "http://x/y.jpg"}"#;

/// What the fake tool does when asked to fetch
#[derive(Clone)]
enum FetchBehavior {
    /// Exit 0 after writing `{template}` with this extension
    Write(&'static str),
    /// Exit 0 without writing anything
    WriteNothing,
    /// Exit with the given code and stderr
    Fail(i32, &'static str),
    /// Exit 0, write the file, but report a fatal diagnostic
    WriteWithFatal(&'static str),
    TimeOut,
}

struct FakeYtDlp {
    metadata: Result<ProcessOutput, Duration>,
    fetch: FetchBehavior,
    calls: Mutex<Vec<ProcessRequest>>,
}

impl FakeYtDlp {
    fn new(metadata_stdout: &str, fetch: FetchBehavior) -> Self {
        Self {
            metadata: Ok(ProcessOutput {
                exit_code: Some(0),
                stdout: metadata_stdout.to_string(),
                stderr: String::new(),
            }),
            fetch,
            calls: Mutex::new(Vec::new()),
        }
    }

    fn calls(&self) -> Vec<ProcessRequest> {
        self.calls.lock().unwrap().clone()
    }

    fn fetch_calls(&self) -> usize {
        self.calls().iter().filter(|r| is_fetch(r)).count()
    }
}

fn is_fetch(request: &ProcessRequest) -> bool {
    request.args.iter().any(|a| a == "-o")
}

fn template_of(request: &ProcessRequest) -> String {
    let pos = request.args.iter().position(|a| a == "-o").unwrap();
    request.args[pos + 1].clone()
}

fn ok(stderr: &str) -> ProcessOutput {
    ProcessOutput {
        exit_code: Some(0),
        stdout: String::new(),
        stderr: stderr.to_string(),
    }
}

#[async_trait]
impl ProcessRunner for FakeYtDlp {
    async fn run(&self, request: &ProcessRequest) -> Result<ProcessOutput, ProcessError> {
        self.calls.lock().unwrap().push(request.clone());

        if !is_fetch(request) {
            return self.metadata.clone().map_err(ProcessError::TimedOut);
        }

        let template = template_of(request);
        match &self.fetch {
            FetchBehavior::Write(ext) => {
                std::fs::write(template.replace("%(ext)s", ext), b"fake media").unwrap();
                Ok(ok("[download] 100% of 10.00KiB\n"))
            }
            FetchBehavior::WriteNothing => Ok(ok("")),
            FetchBehavior::Fail(code, stderr) => Ok(ProcessOutput {
                exit_code: Some(*code),
                stdout: String::new(),
                stderr: stderr.to_string(),
            }),
            FetchBehavior::WriteWithFatal(ext) => {
                std::fs::write(template.replace("%(ext)s", ext), b"fake media").unwrap();
                Ok(ok("ERROR: Postprocessing: Conversion failed!\n"))
            }
            FetchBehavior::TimeOut => Err(ProcessError::TimedOut(request.timeout)),
        }
    }
}

fn service_with(fake: Arc<FakeYtDlp>) -> (VideoDownloadService, TempDir) {
    let temp = TempDir::new().expect("temp dir");
    let settings = AcquisitionSettings {
        temp_dir: temp.path().join("downloads"),
        ..Default::default()
    };
    let service = VideoDownloadService::with_runner(&settings, "yt-dlp", fake).expect("service");
    (service, temp)
}

fn files_in(dir: &std::path::Path) -> Vec<PathBuf> {
    std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().path())
        .collect()
}

#[tokio::test]
async fn construction_creates_temp_dir() {
    let fake = Arc::new(FakeYtDlp::new(METADATA, FetchBehavior::WriteNothing));
    let (service, _temp) = service_with(fake.clone());

    assert!(service.temp_dir().is_dir());
    assert!(service.temp_dir().is_absolute());
    assert!(fake.calls().is_empty(), "construction must not run the tool");
}

#[tokio::test]
async fn get_video_info_happy_path() {
    let fake = Arc::new(FakeYtDlp::new(METADATA, FetchBehavior::WriteNothing));
    let (service, _temp) = service_with(fake.clone());

    let info = service.get_video_info(YOUTUBE_URL).await.expect("info");

    assert_eq!(info.title, "My Talk");
    assert_eq!(info.duration_seconds, 600.0);
    assert_eq!(info.thumbnail_url, "http://x/y.jpg");
    assert_eq!(info.platform, Platform::Youtube);
    assert_eq!(info.source_url, YOUTUBE_URL);

    let calls = fake.calls();
    assert_eq!(calls.len(), 1);
    assert!(calls[0].args.contains(&"--dump-json".to_string()));
    assert_eq!(calls[0].args.last().unwrap(), YOUTUBE_URL);
}

#[tokio::test]
async fn get_video_info_rejects_bad_json() {
    let fake = Arc::new(FakeYtDlp::new("this is not json", FetchBehavior::WriteNothing));
    let (service, _temp) = service_with(fake);

    let err = service.get_video_info(YOUTUBE_URL).await.unwrap_err();
    match err {
        AcquisitionError::MetadataFetch { url, failure } => {
            assert_eq!(url, YOUTUBE_URL);
            assert!(matches!(failure, ToolFailure::InvalidOutput(_)));
        }
        other => panic!("expected MetadataFetch, got {:?}", other),
    }
}

#[tokio::test]
async fn get_video_info_non_zero_exit_carries_stderr() {
    let fake = Arc::new(FakeYtDlp {
        metadata: Ok(ProcessOutput {
            exit_code: Some(1),
            stdout: String::new(),
            stderr: "ERROR: Video unavailable".to_string(),
        }),
        fetch: FetchBehavior::WriteNothing,
        calls: Mutex::new(Vec::new()),
    });
    let (service, _temp) = service_with(fake);

    let err = service.get_video_info(YOUTUBE_URL).await.unwrap_err();
    assert!(!err.is_permanent());
    assert!(err.to_string().contains("Video unavailable"));
}

#[tokio::test]
async fn get_video_info_timeout_is_distinguishable() {
    let fake = Arc::new(FakeYtDlp {
        metadata: Err(Duration::from_secs(120)),
        fetch: FetchBehavior::WriteNothing,
        calls: Mutex::new(Vec::new()),
    });
    let (service, _temp) = service_with(fake);

    let err = service.get_video_info(YOUTUBE_URL).await.unwrap_err();
    assert!(matches!(err, AcquisitionError::MetadataFetch { .. }));
    assert!(err.is_timeout());
}

#[tokio::test]
async fn download_round_trip_and_cleanup() {
    let fake = Arc::new(FakeYtDlp::new(METADATA, FetchBehavior::Write("mp4")));
    let (service, _temp) = service_with(fake.clone());

    let result = service.download_video(YOUTUBE_URL, None).await.expect("download");

    assert!(result.file_path.is_file());
    assert!(result.file_path.is_absolute());
    assert_eq!(result.descriptor.source_url, YOUTUBE_URL);
    assert_eq!(result.descriptor.title, "My Talk");
    let name = result.file_path.file_name().unwrap().to_str().unwrap();
    assert!(name.starts_with("My_Talk_"), "unexpected name {}", name);
    assert!(name.ends_with(".mp4"));

    let fetch = fake.calls().into_iter().find(is_fetch).unwrap();
    assert!(fetch
        .args
        .contains(&"bestvideo[ext=mp4]+bestaudio[ext=m4a]/best[ext=mp4]/best".to_string()));
    assert!(template_of(&fetch).ends_with(".%(ext)s"));

    assert_eq!(service.cleanup(&result.file_path).await, CleanupOutcome::Removed);
    assert!(!result.file_path.exists());
    assert_eq!(
        service.cleanup(&result.file_path).await,
        CleanupOutcome::AlreadyAbsent
    );
}

#[tokio::test]
async fn download_uses_custom_title() {
    let fake = Arc::new(FakeYtDlp::new(METADATA, FetchBehavior::Write("mp4")));
    let (service, _temp) = service_with(fake);

    let result = service
        .download_video(YOUTUBE_URL, Some("Keynote 🎤 2024!"))
        .await
        .expect("download");

    assert_eq!(result.descriptor.title, "Keynote 🎤 2024!");
    let name = result.file_path.file_name().unwrap().to_str().unwrap();
    assert!(name.starts_with("Keynote____2024__"), "unexpected name {}", name);
}

#[tokio::test]
async fn download_empty_custom_title_falls_back() {
    let fake = Arc::new(FakeYtDlp::new(METADATA, FetchBehavior::Write("mp4")));
    let (service, _temp) = service_with(fake);

    let result = service.download_video(YOUTUBE_URL, Some("")).await.expect("download");
    assert_eq!(result.descriptor.title, "My Talk");
}

#[tokio::test]
async fn download_without_matching_file_is_verification_error() {
    let fake = Arc::new(FakeYtDlp::new(METADATA, FetchBehavior::WriteNothing));
    let (service, _temp) = service_with(fake);

    let err = service.download_video(YOUTUBE_URL, None).await.unwrap_err();
    assert!(
        matches!(err, AcquisitionError::DownloadVerification { .. }),
        "got {:?}",
        err
    );
}

#[tokio::test]
async fn download_of_non_mp4_artifact_is_verification_error() {
    let fake = Arc::new(FakeYtDlp::new(METADATA, FetchBehavior::Write("webm")));
    let (service, _temp) = service_with(fake);

    let err = service.download_video(YOUTUBE_URL, None).await.unwrap_err();
    assert!(matches!(err, AcquisitionError::DownloadVerification { .. }));
    // The stray file is left for inspection
    assert_eq!(files_in(service.temp_dir()).len(), 1);
}

#[tokio::test]
async fn download_non_zero_exit_is_execution_error() {
    let fake = Arc::new(FakeYtDlp::new(
        METADATA,
        FetchBehavior::Fail(1, "ERROR: Requested format is not available"),
    ));
    let (service, _temp) = service_with(fake);

    let err = service.download_video(YOUTUBE_URL, None).await.unwrap_err();
    match err {
        AcquisitionError::DownloadExecution {
            failure: ToolFailure::NonZeroExit { code, stderr },
            ..
        } => {
            assert_eq!(code, Some(1));
            assert!(stderr.contains("Requested format"));
        }
        other => panic!("expected DownloadExecution, got {:?}", other),
    }
}

#[tokio::test]
async fn download_fatal_stderr_with_zero_exit_is_execution_error() {
    let fake = Arc::new(FakeYtDlp::new(METADATA, FetchBehavior::WriteWithFatal("mp4")));
    let (service, _temp) = service_with(fake);

    let err = service.download_video(YOUTUBE_URL, None).await.unwrap_err();
    assert!(matches!(
        err,
        AcquisitionError::DownloadExecution {
            failure: ToolFailure::FatalDiagnostics { .. },
            ..
        }
    ));
}

#[tokio::test]
async fn download_timeout_is_execution_error() {
    let fake = Arc::new(FakeYtDlp::new(METADATA, FetchBehavior::TimeOut));
    let (service, _temp) = service_with(fake);

    let err = service.download_video(YOUTUBE_URL, None).await.unwrap_err();
    assert!(matches!(err, AcquisitionError::DownloadExecution { .. }));
    assert!(err.is_timeout());
    assert!(!err.is_permanent());
}

#[tokio::test]
async fn unsupported_platform_spawns_nothing() {
    let fake = Arc::new(FakeYtDlp::new(METADATA, FetchBehavior::Write("mp4")));
    let (service, _temp) = service_with(fake.clone());

    let err = service
        .download_video("https://zoom.us/rec/share/xyz", None)
        .await
        .unwrap_err();

    assert!(matches!(err, AcquisitionError::UnsupportedPlatform { .. }));
    assert!(err.is_permanent());
    assert!(fake.calls().is_empty());
}

#[tokio::test]
async fn malformed_url_spawns_nothing() {
    let fake = Arc::new(FakeYtDlp::new(METADATA, FetchBehavior::Write("mp4")));
    let (service, _temp) = service_with(fake.clone());

    let err = service
        .download_video("youtube.com/watch?v=abc", None)
        .await
        .unwrap_err();

    assert!(matches!(err, AcquisitionError::MalformedUrl { .. }));
    assert_eq!(fake.fetch_calls(), 0);
    assert!(fake.calls().is_empty());
}

#[tokio::test]
async fn repeated_downloads_get_distinct_files() {
    let fake = Arc::new(FakeYtDlp::new(METADATA, FetchBehavior::Write("mp4")));
    let (service, _temp) = service_with(fake);

    let first = service.download_video(YOUTUBE_URL, None).await.expect("first");
    tokio::time::sleep(Duration::from_millis(5)).await;
    let second = service.download_video(YOUTUBE_URL, None).await.expect("second");

    assert_ne!(first.file_path, second.file_path);
    assert!(first.file_path.is_file());
    assert!(second.file_path.is_file());
}

#[tokio::test]
async fn cleanup_of_missing_file_never_fails() {
    let fake = Arc::new(FakeYtDlp::new(METADATA, FetchBehavior::WriteNothing));
    let (service, temp) = service_with(fake);

    let missing = temp.path().join("never-existed.mp4");
    assert_eq!(service.cleanup(&missing).await, CleanupOutcome::AlreadyAbsent);
    assert_eq!(service.cleanup(&missing).await, CleanupOutcome::AlreadyAbsent);
}

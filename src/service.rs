//! Video acquisition facade
//!
//! Wires the classifier, prober and orchestrator together and owns the shared
//! temp directory. The directory is created once, when the service is built.

use path_absolutize::Absolutize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

use crate::downloader::orchestrator::{CleanupOutcome, DownloadOrchestrator};
use crate::extractor::models::{DownloadResult, VideoDescriptor};
use crate::extractor::platform::{self, Platform};
use crate::extractor::prober::MetadataProber;
use crate::extractor::runner::TokioProcessRunner;
use crate::extractor::traits::ProcessRunner;
use crate::extractor::ytdlp::YtDlp;
use crate::utils::config::AcquisitionSettings;
use crate::utils::error::{AcquisitionError, Result};

/// Entry point for the ingestion pipeline.
///
/// Stateless between calls apart from the temp directory, so a single
/// instance can serve any number of concurrent downloads.
#[derive(Debug, Clone)]
pub struct VideoDownloadService {
    tool: YtDlp,
    prober: MetadataProber,
    orchestrator: DownloadOrchestrator,
}

impl VideoDownloadService {
    /// Build a service that runs the discovered yt-dlp binary
    pub fn new(settings: &AcquisitionSettings) -> Result<Self> {
        let program = YtDlp::locate(settings)?;
        Self::with_runner(settings, program, Arc::new(TokioProcessRunner::new()))
    }

    /// Build a service on top of any process runner
    pub fn with_runner(
        settings: &AcquisitionSettings,
        program: impl Into<PathBuf>,
        runner: Arc<dyn ProcessRunner>,
    ) -> Result<Self> {
        settings.validate()?;
        let temp_dir = prepare_temp_dir(&settings.temp_dir)?;

        let tool = YtDlp::new(program, runner, settings);
        let prober = MetadataProber::new(tool.clone());
        let orchestrator = DownloadOrchestrator::new(tool.clone(), prober.clone(), temp_dir);

        Ok(Self {
            tool,
            prober,
            orchestrator,
        })
    }

    pub fn detect_platform(&self, url: &str) -> Platform {
        platform::classify(url)
    }

    pub fn validate_url(&self, url: &str) -> Result<()> {
        platform::validate(url)
    }

    pub async fn get_video_info(&self, url: &str) -> Result<VideoDescriptor> {
        self.prober.probe(url).await
    }

    pub async fn download_video(&self, url: &str, custom_title: Option<&str>) -> Result<DownloadResult> {
        self.orchestrator.download(url, custom_title).await
    }

    pub async fn cleanup(&self, file_path: &Path) -> CleanupOutcome {
        self.orchestrator.cleanup(file_path).await
    }

    pub fn supported_platforms(&self) -> Vec<String> {
        platform::supported_platforms()
    }

    pub fn temp_dir(&self) -> &Path {
        self.orchestrator.temp_dir()
    }

    pub fn tool(&self) -> &YtDlp {
        &self.tool
    }
}

/// Create the shared directory if needed and return its absolute form
fn prepare_temp_dir(dir: &Path) -> Result<PathBuf> {
    let storage_error = |source| AcquisitionError::Storage {
        path: dir.to_path_buf(),
        source,
    };

    let absolute = dir.absolutize().map_err(storage_error)?.into_owned();
    if !absolute.exists() {
        info!("Creating temp directory: {}", absolute.display());
    }
    std::fs::create_dir_all(&absolute).map_err(storage_error)?;
    debug!("Temp directory ready: {}", absolute.display());
    Ok(absolute)
}

//! Download orchestration: validate, probe, fetch, locate

use chrono::Utc;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, error, info, warn};

use crate::downloader::naming::{base_filename, is_artifact, output_template};
use crate::downloader::progress::assess_stderr;
use crate::extractor::models::DownloadResult;
use crate::extractor::platform::validate;
use crate::extractor::prober::MetadataProber;
use crate::extractor::ytdlp::YtDlp;
use crate::utils::error::{AcquisitionError, Result, ToolFailure};

/// What happened to a file handed to [`DownloadOrchestrator::cleanup`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CleanupOutcome {
    Removed,
    AlreadyAbsent,
    Failed,
}

/// Fetches media into the shared temp directory
#[derive(Debug, Clone)]
pub struct DownloadOrchestrator {
    tool: YtDlp,
    prober: MetadataProber,
    temp_dir: PathBuf,
}

impl DownloadOrchestrator {
    /// `temp_dir` must already exist and be absolute.
    pub fn new(tool: YtDlp, prober: MetadataProber, temp_dir: PathBuf) -> Self {
        Self {
            tool,
            prober,
            temp_dir,
        }
    }

    pub fn temp_dir(&self) -> &Path {
        &self.temp_dir
    }

    /// Download a video, returning the path of the finished mp4.
    ///
    /// An empty `custom_title` counts as absent. Files left behind by a
    /// failed download are not removed.
    pub async fn download(&self, url: &str, custom_title: Option<&str>) -> Result<DownloadResult> {
        info!("Starting download from: {}", url);

        validate(url)?;
        let probed = self.prober.probe(url).await?;

        let custom_title = custom_title.filter(|t| !t.is_empty());
        let title = custom_title.unwrap_or(&probed.title);
        let base_name = base_filename(title, Utc::now().timestamp_millis());
        let template = output_template(&self.temp_dir, &base_name);

        debug!("Fetching {} into {}", url, template.display());
        let output = self
            .tool
            .fetch(&template, url)
            .await
            .map_err(|failure| execution_error(url, failure))?;

        if !output.success() {
            return Err(execution_error(
                url,
                ToolFailure::NonZeroExit {
                    code: output.exit_code,
                    stderr: output.stderr,
                },
            ));
        }

        let report = assess_stderr(&output.stderr);
        if report.has_fatal() {
            return Err(execution_error(
                url,
                ToolFailure::FatalDiagnostics {
                    stderr: report.fatal.join("\n"),
                },
            ));
        }
        if let Some(noise) = report.noise() {
            warn!("yt-dlp stderr: {}", noise);
        }
        if let Some(last) = report.last_progress {
            debug!("Final progress: {:.1}% of {} bytes", last.percent, last.total_bytes);
        }

        let file_path = self.locate_artifact(url, &base_name).await?;
        info!("Video downloaded successfully: {}", file_path.display());

        let descriptor = match custom_title {
            Some(custom) => probed.with_title(custom),
            None => probed,
        };

        Ok(DownloadResult {
            file_path,
            descriptor,
        })
    }

    /// Find the finished `{base_name}*.mp4` the tool wrote.
    async fn locate_artifact(&self, url: &str, base_name: &str) -> Result<PathBuf> {
        let storage_error = |source| AcquisitionError::Storage {
            path: self.temp_dir.clone(),
            source,
        };

        let mut entries = fs::read_dir(&self.temp_dir).await.map_err(storage_error)?;
        while let Some(entry) = entries.next_entry().await.map_err(storage_error)? {
            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                continue;
            };
            if is_artifact(name, base_name) && entry.file_type().await.map_or(false, |t| t.is_file()) {
                return Ok(entry.path());
            }
        }

        error!("Downloaded file not found for {} (expected {}*.mp4)", url, base_name);
        Err(AcquisitionError::DownloadVerification {
            url: url.to_string(),
            base_name: base_name.to_string(),
            dir: self.temp_dir.clone(),
        })
    }

    /// Delete a downloaded file. Never fails: a missing file or a failed
    /// deletion is logged as a warning and reported in the outcome.
    pub async fn cleanup(&self, file_path: &Path) -> CleanupOutcome {
        match fs::remove_file(file_path).await {
            Ok(()) => {
                info!("Cleaned up: {}", file_path.display());
                CleanupOutcome::Removed
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!("Nothing to clean up at {}", file_path.display());
                CleanupOutcome::AlreadyAbsent
            }
            Err(e) => {
                warn!("Failed to cleanup {}: {}", file_path.display(), e);
                CleanupOutcome::Failed
            }
        }
    }
}

fn execution_error(url: &str, failure: ToolFailure) -> AcquisitionError {
    error!("Download failed for {}: {}", url, failure);
    AcquisitionError::DownloadExecution {
        url: url.to_string(),
        failure,
    }
}

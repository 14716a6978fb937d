//! yt-dlp invocation contract
//!
//! This module knows which arguments the extraction tool takes in metadata
//! mode and in fetch mode, and nothing about what the caller does with the
//! results.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use crate::extractor::traits::{ProcessError, ProcessOutput, ProcessRequest, ProcessRunner};
use crate::utils::config::AcquisitionSettings;
use crate::utils::error::{AcquisitionError, Result, ToolFailure};
use crate::utils::paths;

/// Ordered format preference: pre-merged mp4 video+audio, then best mp4, then anything.
pub const FORMAT_SELECTION: &str = "bestvideo[ext=mp4]+bestaudio[ext=m4a]/best[ext=mp4]/best";

/// Container the tool is asked to merge into.
pub const MERGE_FORMAT: &str = "mp4";

/// Extension placeholder substituted by the tool itself.
pub const EXT_PLACEHOLDER: &str = "%(ext)s";

/// Handle on the external extraction tool
#[derive(Clone)]
pub struct YtDlp {
    program: PathBuf,
    runner: Arc<dyn ProcessRunner>,
    probe_timeout: Duration,
    download_timeout: Duration,
    max_output_bytes: usize,
}

impl std::fmt::Debug for YtDlp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("YtDlp")
            .field("program", &self.program)
            .field("probe_timeout", &self.probe_timeout)
            .field("download_timeout", &self.download_timeout)
            .field("max_output_bytes", &self.max_output_bytes)
            .finish()
    }
}

impl YtDlp {
    pub fn new(
        program: impl Into<PathBuf>,
        runner: Arc<dyn ProcessRunner>,
        settings: &AcquisitionSettings,
    ) -> Self {
        Self {
            program: program.into(),
            runner,
            probe_timeout: settings.probe_timeout(),
            download_timeout: settings.download_timeout(),
            max_output_bytes: settings.max_output_bytes,
        }
    }

    /// Resolve the binary from the settings or the environment.
    ///
    /// Search order:
    /// 1. Explicit `ytdlp_path` setting
    /// 2. Next to the current executable
    /// 3. System PATH and common install locations
    pub fn locate(settings: &AcquisitionSettings) -> Result<PathBuf> {
        if let Some(explicit) = &settings.ytdlp_path {
            debug!("Using configured yt-dlp: {}", explicit.display());
            return Ok(explicit.clone());
        }
        match paths::ytdlp_path() {
            Some(path) => {
                info!("Found yt-dlp at: {}", path.display());
                Ok(path)
            }
            None => Err(AcquisitionError::ToolNotFound),
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Arguments for metadata-only mode: one JSON object on stdout, no download
    pub fn metadata_args(url: &str) -> Vec<String> {
        [
            "--dump-json",
            "--no-download",
            "--no-warnings",
            "--no-playlist",
            "--",
            url,
        ]
        .iter()
        .map(|s| s.to_string())
        .collect()
    }

    /// Arguments for fetch mode writing to `output_template`
    pub fn fetch_args(output_template: &Path, url: &str) -> Vec<String> {
        vec![
            "-f".to_string(),
            FORMAT_SELECTION.to_string(),
            "--merge-output-format".to_string(),
            MERGE_FORMAT.to_string(),
            "--newline".to_string(),
            "--no-playlist".to_string(),
            "-o".to_string(),
            output_template.to_string_lossy().into_owned(),
            "--".to_string(),
            url.to_string(),
        ]
    }

    /// Run metadata mode and return the raw output
    pub async fn dump_json(&self, url: &str) -> std::result::Result<ProcessOutput, ToolFailure> {
        self.run(Self::metadata_args(url), self.probe_timeout).await
    }

    /// Run fetch mode and return the raw output
    pub async fn fetch(
        &self,
        output_template: &Path,
        url: &str,
    ) -> std::result::Result<ProcessOutput, ToolFailure> {
        self.run(Self::fetch_args(output_template, url), self.download_timeout)
            .await
    }

    /// Ask the tool for its version string
    pub async fn version(&self) -> std::result::Result<String, ToolFailure> {
        let output = self
            .run(vec!["--version".to_string()], self.probe_timeout)
            .await?;
        if !output.success() {
            return Err(ToolFailure::NonZeroExit {
                code: output.exit_code,
                stderr: output.stderr,
            });
        }
        Ok(output.stdout.trim().to_string())
    }

    async fn run(
        &self,
        args: Vec<String>,
        timeout: Duration,
    ) -> std::result::Result<ProcessOutput, ToolFailure> {
        let request = ProcessRequest {
            program: self.program.clone(),
            args,
            timeout,
            max_output_bytes: self.max_output_bytes,
        };
        self.runner.run(&request).await.map_err(|e| match e {
            ProcessError::Spawn { program, source } => ToolFailure::Spawn {
                program: program.display().to_string(),
                reason: source.to_string(),
            },
            ProcessError::TimedOut(after) => ToolFailure::TimedOut { after },
            ProcessError::OutputTooLarge(limit) => ToolFailure::OutputTooLarge { limit },
            ProcessError::Io(e) => ToolFailure::InvalidOutput(e.to_string()),
        })
    }
}

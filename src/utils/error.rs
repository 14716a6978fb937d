//! Error handling for clipfetch

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

use crate::extractor::platform::{Platform, SUPPORTED_PLATFORMS_MESSAGE};

/// Message shown to end users when the extraction tool itself failed.
pub const GENERIC_FAILURE_MESSAGE: &str = "Video processing failed, please try again";

/// Why an invocation of the external extraction tool did not produce a usable result
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ToolFailure {
    #[error("could not start {program}: {reason}")]
    Spawn { program: String, reason: String },

    #[error("exited with status {}: {stderr}", .code.map_or_else(|| "signal".to_string(), |c| c.to_string()))]
    NonZeroExit { code: Option<i32>, stderr: String },

    #[error("timed out after {}s", .after.as_secs())]
    TimedOut { after: Duration },

    #[error("output exceeded {limit} bytes")]
    OutputTooLarge { limit: usize },

    #[error("unparseable output: {0}")]
    InvalidOutput(String),

    #[error("reported fatal errors: {stderr}")]
    FatalDiagnostics { stderr: String },
}

/// Main error type for clipfetch
#[derive(Debug, Error)]
pub enum AcquisitionError {
    #[error("Invalid URL format: {url} ({reason})")]
    MalformedUrl { url: String, reason: String },

    #[error("{} (got {platform} for {url})", SUPPORTED_PLATFORMS_MESSAGE)]
    UnsupportedPlatform { url: String, platform: Platform },

    #[error("Failed to fetch video information for {url}: {failure}")]
    MetadataFetch { url: String, failure: ToolFailure },

    #[error("Failed to download video from {url}: {failure}")]
    DownloadExecution { url: String, failure: ToolFailure },

    #[error("Downloaded file not found: no {base_name}*.mp4 in {} after fetching {url}", .dir.display())]
    DownloadVerification {
        url: String,
        base_name: String,
        dir: PathBuf,
    },

    #[error("Storage error at {}: {source}", .path.display())]
    Storage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("yt-dlp not found. Please install yt-dlp")]
    ToolNotFound,

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl AcquisitionError {
    /// Input errors that will fail identically on every retry
    pub fn is_permanent(&self) -> bool {
        matches!(
            self,
            AcquisitionError::MalformedUrl { .. } | AcquisitionError::UnsupportedPlatform { .. }
        )
    }

    /// Whether the extraction tool was killed for exceeding its time budget
    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            AcquisitionError::MetadataFetch {
                failure: ToolFailure::TimedOut { .. },
                ..
            } | AcquisitionError::DownloadExecution {
                failure: ToolFailure::TimedOut { .. },
                ..
            }
        )
    }

    /// The text to show the person who submitted the URL.
    pub fn user_message(&self) -> String {
        match self {
            AcquisitionError::UnsupportedPlatform { .. } => SUPPORTED_PLATFORMS_MESSAGE.to_string(),
            AcquisitionError::MalformedUrl { .. } => "Invalid URL format".to_string(),
            AcquisitionError::MetadataFetch { .. } => {
                "Failed to fetch video information. Please check the URL.".to_string()
            }
            _ => GENERIC_FAILURE_MESSAGE.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, AcquisitionError>;

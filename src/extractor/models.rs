//! Data structures for video information

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::extractor::platform::Platform;

/// Title used when the extraction tool reports none.
pub const UNTITLED: &str = "Untitled Video";

/// Normalized metadata for a remote video
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoDescriptor {
    pub title: String,
    /// Seconds; `0.0` means the duration is unknown
    #[serde(rename = "duration")]
    pub duration_seconds: f64,
    #[serde(rename = "thumbnail")]
    pub thumbnail_url: String,
    pub platform: Platform,
    /// The input URL, verbatim
    #[serde(rename = "url")]
    pub source_url: String,
}

impl VideoDescriptor {
    /// Copy of this descriptor carrying a different title
    pub fn with_title(&self, title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..self.clone()
        }
    }
}

/// A downloaded media file and the descriptor of the video it came from.
///
/// The file stays on disk until the caller hands `file_path` to cleanup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DownloadResult {
    pub file_path: PathBuf,
    #[serde(rename = "info")]
    pub descriptor: VideoDescriptor,
}

//! clipfetch library
//!
//! Turns a creator-supplied video URL into a local mp4 plus normalized
//! metadata by driving yt-dlp as a subprocess.

pub mod downloader;
pub mod extractor;
pub mod service;
pub mod utils;

// Re-export main types for easier use
pub use downloader::{CleanupOutcome, DownloadOrchestrator};
pub use extractor::{
    DownloadResult, MetadataProber, Platform, ProcessOutput, ProcessRequest, ProcessRunner,
    TokioProcessRunner, VideoDescriptor, YtDlp,
};
pub use service::VideoDownloadService;
pub use utils::{AcquisitionError, AcquisitionSettings, ToolFailure};

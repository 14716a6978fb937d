pub mod models;
pub mod platform;
pub mod prober;
pub mod runner;
pub mod traits;
pub mod ytdlp;

pub use models::{DownloadResult, VideoDescriptor};
pub use platform::{classify, supported_platforms, validate, Platform};
pub use prober::MetadataProber;
pub use runner::TokioProcessRunner;
pub use traits::{ProcessError, ProcessOutput, ProcessRequest, ProcessRunner};
pub use ytdlp::YtDlp;

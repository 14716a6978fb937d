//! Download orchestration module

pub mod naming;
pub mod orchestrator;
pub mod progress;

// Re-export for convenience
pub use naming::{base_filename, sanitize_title};
pub use orchestrator::{CleanupOutcome, DownloadOrchestrator};
pub use progress::{assess_stderr, StderrReport};

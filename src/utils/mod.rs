//! Utility modules for error handling and configuration

pub mod config;
pub mod error;
pub mod paths;

// Re-export for convenience
pub use config::AcquisitionSettings;
pub use error::{AcquisitionError, ToolFailure};

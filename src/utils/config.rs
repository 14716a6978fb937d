//! Acquisition configuration

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

use crate::utils::error::{AcquisitionError, Result};
use crate::utils::paths;

/// Acquisition settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AcquisitionSettings {
    /// Shared directory all downloads are written to
    pub temp_dir: PathBuf,

    /// Explicit yt-dlp binary; discovered when absent
    pub ytdlp_path: Option<PathBuf>,

    /// Time budget for a metadata probe
    pub probe_timeout_secs: u64,

    /// Time budget for a media fetch
    pub download_timeout_secs: u64,

    /// Capture limit per output stream (bytes)
    pub max_output_bytes: usize,
}

impl Default for AcquisitionSettings {
    fn default() -> Self {
        Self {
            temp_dir: paths::default_temp_dir(),
            ytdlp_path: None,
            probe_timeout_secs: 120,
            download_timeout_secs: 1800, // 30 minutes
            max_output_bytes: 10 * 1024 * 1024,
        }
    }
}

impl AcquisitionSettings {
    /// Read settings from a JSON file. Missing keys keep their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            AcquisitionError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        let settings: Self = serde_json::from_str(&raw).map_err(|e| {
            AcquisitionError::Config(format!("cannot parse {}: {}", path.display(), e))
        })?;
        debug!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Apply `CLIPFETCH_*` environment overrides
    pub fn apply_env(mut self) -> Result<Self> {
        if let Ok(dir) = std::env::var("CLIPFETCH_TEMP_DIR") {
            self.temp_dir = PathBuf::from(dir);
        }
        if let Ok(bin) = std::env::var("CLIPFETCH_YTDLP") {
            self.ytdlp_path = Some(PathBuf::from(bin));
        }
        if let Ok(secs) = std::env::var("CLIPFETCH_PROBE_TIMEOUT") {
            self.probe_timeout_secs = parse_secs("CLIPFETCH_PROBE_TIMEOUT", &secs)?;
        }
        if let Ok(secs) = std::env::var("CLIPFETCH_DOWNLOAD_TIMEOUT") {
            self.download_timeout_secs = parse_secs("CLIPFETCH_DOWNLOAD_TIMEOUT", &secs)?;
        }
        Ok(self)
    }

    /// Reject limits that would make every invocation fail
    pub fn validate(&self) -> Result<()> {
        if self.probe_timeout_secs == 0 || self.download_timeout_secs == 0 {
            return Err(AcquisitionError::Config(
                "timeouts must be at least one second".to_string(),
            ));
        }
        if self.max_output_bytes == 0 {
            return Err(AcquisitionError::Config(
                "max_output_bytes must be positive".to_string(),
            ));
        }
        if self.temp_dir.as_os_str().is_empty() {
            return Err(AcquisitionError::Config("temp_dir is empty".to_string()));
        }
        Ok(())
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }

    pub fn download_timeout(&self) -> Duration {
        Duration::from_secs(self.download_timeout_secs)
    }
}

fn parse_secs(name: &str, value: &str) -> Result<u64> {
    value
        .trim()
        .parse()
        .map_err(|_| AcquisitionError::Config(format!("{} must be a whole number of seconds", name)))
}

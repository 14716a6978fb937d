//! Filesystem locations used by clipfetch
//!
//! This module provides:
//! - The default shared download directory
//! - yt-dlp binary discovery

use std::path::{Path, PathBuf};
use tracing::debug;

/// Returns the default shared temp directory
/// - All platforms: `<system temp>/clipfetch/downloads`
pub fn default_temp_dir() -> PathBuf {
    std::env::temp_dir().join("clipfetch").join("downloads")
}

/// Platform-specific binary name
fn ytdlp_binary_name() -> &'static str {
    if cfg!(target_os = "windows") {
        "yt-dlp.exe"
    } else {
        "yt-dlp"
    }
}

/// Returns the path to yt-dlp executable
pub fn ytdlp_path() -> Option<PathBuf> {
    // 1. Next to our own executable (bundled deployments)
    if let Some(adjacent) = adjacent_to_exe() {
        debug!("Using bundled yt-dlp: {:?}", adjacent);
        return Some(adjacent);
    }

    // 2. System PATH
    if let Ok(path) = which::which("yt-dlp") {
        return Some(path);
    }

    // 3. Common locations missing from service PATHs
    common_install_paths()
        .into_iter()
        .find(|candidate| is_executable(candidate))
}

fn adjacent_to_exe() -> Option<PathBuf> {
    let exe_path = std::env::current_exe().ok()?;
    let candidate = exe_path.parent()?.join(ytdlp_binary_name());
    is_executable(&candidate).then_some(candidate)
}

fn common_install_paths() -> Vec<PathBuf> {
    let mut paths = vec![
        PathBuf::from("/usr/local/bin/yt-dlp"),
        PathBuf::from("/usr/bin/yt-dlp"),
        PathBuf::from("/opt/homebrew/bin/yt-dlp"),
    ];
    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(".local").join("bin").join("yt-dlp"));
    }
    paths
}

/// Check if a file is executable
fn is_executable(path: &Path) -> bool {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;

        std::fs::metadata(path)
            .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
            .unwrap_or(false)
    }

    #[cfg(not(unix))]
    {
        path.is_file()
    }
}

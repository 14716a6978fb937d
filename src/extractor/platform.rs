//! Video platform detection and URL validation
//!
//! Classification is a case-insensitive substring match against an ordered
//! list of domain markers; the first marker that matches decides the platform.
//! No network I/O happens here.

use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

use crate::utils::error::{AcquisitionError, Result};

/// Message used whenever a URL is rejected for its platform.
pub const SUPPORTED_PLATFORMS_MESSAGE: &str =
    "Unsupported platform. Supported: YouTube, Vimeo, Rumble, Twitter, TikTok";

/// Originating video service inferred from the URL shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Youtube,
    Vimeo,
    Rumble,
    Zoom,
    Twitter,
    Tiktok,
    Unknown,
}

/// Ordered domain markers. Order matters: `x.com` is a very loose marker and
/// must stay behind every other one.
const DOMAIN_MARKERS: &[(&str, Platform)] = &[
    ("youtube.com", Platform::Youtube),
    ("youtu.be", Platform::Youtube),
    ("vimeo.com", Platform::Vimeo),
    ("rumble.com", Platform::Rumble),
    ("zoom.us", Platform::Zoom),
    ("twitter.com", Platform::Twitter),
    ("x.com", Platform::Twitter),
    ("tiktok.com", Platform::Tiktok),
];

/// Zoom is recognised but cannot be downloaded.
const DOWNLOADABLE: &[Platform] = &[
    Platform::Youtube,
    Platform::Vimeo,
    Platform::Rumble,
    Platform::Twitter,
    Platform::Tiktok,
];

impl Platform {
    /// Get string representation used in descriptors and logs
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Youtube => "youtube",
            Platform::Vimeo => "vimeo",
            Platform::Rumble => "rumble",
            Platform::Zoom => "zoom",
            Platform::Twitter => "twitter",
            Platform::Tiktok => "tiktok",
            Platform::Unknown => "unknown",
        }
    }

    pub fn is_downloadable(&self) -> bool {
        DOWNLOADABLE.contains(self)
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Map any string to a platform. Never fails; unmatched input is `Unknown`.
pub fn classify(url: &str) -> Platform {
    let lower = url.to_lowercase();
    DOMAIN_MARKERS
        .iter()
        .find(|(marker, _)| lower.contains(marker))
        .map(|&(_, platform)| platform)
        .unwrap_or(Platform::Unknown)
}

/// Check that a URL can be handed to the downloader.
///
/// The platform check runs first, so a string such as `"not a url"` is
/// reported as [`AcquisitionError::UnsupportedPlatform`], while
/// `"youtube.com/watch"` passes the platform check and is then rejected as
/// [`AcquisitionError::MalformedUrl`] for lacking a scheme.
pub fn validate(url: &str) -> Result<()> {
    let platform = classify(url);
    if !platform.is_downloadable() {
        return Err(AcquisitionError::UnsupportedPlatform {
            url: url.to_string(),
            platform,
        });
    }

    let parsed = Url::parse(url).map_err(|e| AcquisitionError::MalformedUrl {
        url: url.to_string(),
        reason: e.to_string(),
    })?;

    if parsed.host_str().map_or(true, str::is_empty) {
        return Err(AcquisitionError::MalformedUrl {
            url: url.to_string(),
            reason: "URL has no host".to_string(),
        });
    }

    Ok(())
}

/// Display names of the platforms accepted by [`validate`]
pub fn supported_platforms() -> Vec<String> {
    ["YouTube", "Vimeo", "Rumble", "Twitter/X", "TikTok"]
        .iter()
        .map(|name| name.to_string())
        .collect()
}

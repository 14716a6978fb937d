//! Metadata probing through the extraction tool's JSON dump

use serde_json::{Map, Value};
use tracing::{debug, error, info};

use crate::extractor::models::{VideoDescriptor, UNTITLED};
use crate::extractor::platform::classify;
use crate::extractor::ytdlp::YtDlp;
use crate::utils::error::{AcquisitionError, Result, ToolFailure};

/// Fetches and normalizes video metadata without downloading media
#[derive(Debug, Clone)]
pub struct MetadataProber {
    tool: YtDlp,
}

impl MetadataProber {
    pub fn new(tool: YtDlp) -> Self {
        Self { tool }
    }

    /// Extract video information without downloading.
    ///
    /// Exactly one tool invocation per call, no retries. The platform comes
    /// from [`classify`], never from the tool's own extractor name.
    pub async fn probe(&self, url: &str) -> Result<VideoDescriptor> {
        info!("Fetching video info for: {}", url);

        let output = self.tool.dump_json(url).await.map_err(|failure| {
            error!("yt-dlp metadata invocation failed for {}: {}", url, failure);
            AcquisitionError::MetadataFetch {
                url: url.to_string(),
                failure,
            }
        })?;

        if !output.success() {
            error!("yt-dlp extraction failed: {}", output.stderr);
            return Err(AcquisitionError::MetadataFetch {
                url: url.to_string(),
                failure: ToolFailure::NonZeroExit {
                    code: output.exit_code,
                    stderr: output.stderr,
                },
            });
        }

        let descriptor = parse_descriptor(&output.stdout, url).map_err(|failure| {
            error!("Failed to parse video info for {}: {}", url, failure);
            AcquisitionError::MetadataFetch {
                url: url.to_string(),
                failure,
            }
        })?;

        info!(
            "Video info extracted: \"{}\" ({}s)",
            descriptor.title, descriptor.duration_seconds
        );
        Ok(descriptor)
    }
}

/// Normalize the tool's JSON object into a descriptor.
///
/// Missing, null, empty or mistyped fields fall back to their defaults; only
/// output that is not a JSON object is an error.
pub fn parse_descriptor(stdout: &str, url: &str) -> std::result::Result<VideoDescriptor, ToolFailure> {
    let value: Value = serde_json::from_str(stdout.trim())
        .map_err(|e| ToolFailure::InvalidOutput(format!("invalid JSON: {}", e)))?;
    let json = value
        .as_object()
        .ok_or_else(|| ToolFailure::InvalidOutput("JSON is not an object".to_string()))?;

    let title = non_empty_str(json, "title").unwrap_or(UNTITLED).to_string();
    let duration_seconds = json
        .get("duration")
        .and_then(Value::as_f64)
        .filter(|d| d.is_finite() && *d > 0.0)
        .unwrap_or(0.0);
    let thumbnail_url = non_empty_str(json, "thumbnail").unwrap_or_default().to_string();

    debug!("Parsed metadata keys: {}", json.len());

    Ok(VideoDescriptor {
        title,
        duration_seconds,
        thumbnail_url,
        platform: classify(url),
        source_url: url.to_string(),
    })
}

fn non_empty_str<'a>(json: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    json.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

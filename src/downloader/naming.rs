//! Output file naming in the shared temp directory
//!
//! Names look like `{title}_{epoch_millis}.{ext}` where `title` holds at most
//! 50 characters from `[A-Za-z0-9_]`.

use std::path::{Path, PathBuf};

use crate::extractor::ytdlp::EXT_PLACEHOLDER;

pub const MAX_TITLE_LEN: usize = 50;

/// Extension of the only artifact accepted after a fetch.
pub const ARTIFACT_EXTENSION: &str = ".mp4";

/// Replace everything outside `[A-Za-z0-9]` with `_` and cap the length.
///
/// Characters outside the Basic Multilingual Plane (most emoji) count as two
/// UTF-16 units and become two underscores.
pub fn sanitize_title(title: &str) -> String {
    let mut out = String::with_capacity(MAX_TITLE_LEN);
    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c);
        } else {
            for _ in 0..c.len_utf16() {
                out.push('_');
            }
        }
        if out.len() >= MAX_TITLE_LEN {
            break;
        }
    }
    out.truncate(MAX_TITLE_LEN);
    out
}

/// Unique base filename for one download
pub fn base_filename(title: &str, epoch_millis: i64) -> String {
    format!("{}_{}", sanitize_title(title), epoch_millis)
}

/// `-o` template handed to the tool; it substitutes the real extension
pub fn output_template(dir: &Path, base_name: &str) -> PathBuf {
    dir.join(format!("{}.{}", base_name, EXT_PLACEHOLDER))
}

/// Whether a directory entry is the finished artifact for `base_name`.
///
/// In-progress `.part` files and intermediate containers never match.
pub fn is_artifact(file_name: &str, base_name: &str) -> bool {
    file_name.starts_with(base_name) && file_name.ends_with(ARTIFACT_EXTENSION)
}

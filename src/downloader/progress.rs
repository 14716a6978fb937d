//! Reading the extraction tool's stderr after a fetch
//!
//! Progress lines are expected noise. Lines carrying the tool's fatal marker
//! fail the download even when the exit code is zero; anything else is logged.

/// Marker the tool prefixes to progress lines.
pub const PROGRESS_MARKER: &str = "[download]";

/// Marker the tool prefixes to fatal diagnostics.
pub const FATAL_MARKER: &str = "ERROR:";

/// One parsed progress line
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressSample {
    pub percent: f64,
    pub speed_bps: f64,
    pub total_bytes: u64,
}

/// Classified stderr of one fetch invocation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StderrReport {
    pub progress_lines: usize,
    pub last_progress: Option<ProgressSample>,
    pub fatal: Vec<String>,
    pub other: Vec<String>,
}

impl StderrReport {
    pub fn has_fatal(&self) -> bool {
        !self.fatal.is_empty()
    }

    /// Non-progress, non-fatal lines joined for a warning log
    pub fn noise(&self) -> Option<String> {
        if self.other.is_empty() {
            None
        } else {
            Some(self.other.join("\n"))
        }
    }
}

pub fn assess_stderr(stderr: &str) -> StderrReport {
    let mut report = StderrReport::default();
    for line in stderr.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if line.starts_with(FATAL_MARKER) {
            report.fatal.push(line.to_string());
        } else if line.starts_with(PROGRESS_MARKER) {
            report.progress_lines += 1;
            if let Some(sample) = parse_progress(line) {
                report.last_progress = Some(sample);
            }
        } else {
            report.other.push(line.to_string());
        }
    }
    report
}

/// Parse lines like `[download]  42.5% of ~ 150.00MiB at  5.20MiB/s ETA 00:15`
pub fn parse_progress(line: &str) -> Option<ProgressSample> {
    let pct_pos = line.find('%')?;
    let before = &line[..pct_pos];
    let num_start = before
        .rfind(|c: char| !(c.is_ascii_digit() || c == '.'))
        .map_or(0, |i| i + 1);
    let percent = before[num_start..].parse::<f64>().ok()?;

    let total_bytes = line
        .find(" of ")
        .map(|idx| {
            let after = line[idx + 4..].trim_start();
            let after = after.strip_prefix('~').unwrap_or(after).trim_start();
            let end = after.find(" at ").unwrap_or(after.len());
            parse_size(after[..end].trim()).unwrap_or(0.0) as u64
        })
        .unwrap_or(0);

    let speed_bps = line
        .find(" at ")
        .and_then(|idx| {
            let after = &line[idx + 4..];
            let slash = after.find("/s")?;
            parse_size(after[..slash].trim())
        })
        .unwrap_or(0.0);

    Some(ProgressSample {
        percent,
        speed_bps,
        total_bytes,
    })
}

fn parse_size(token: &str) -> Option<f64> {
    let split = token
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(token.len());
    let num = token[..split].parse::<f64>().ok()?;
    let multiplier = match token[split..].trim() {
        "KiB" => 1024.0,
        "MiB" => 1024.0 * 1024.0,
        "GiB" => 1024.0 * 1024.0 * 1024.0,
        _ => 1.0,
    };
    Some(num * multiplier)
}

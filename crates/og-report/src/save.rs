// ABOUTME: Writes HTML reports to disk under a deterministic, URL-derived file name.
// ABOUTME: Names look like <url-without-scheme-with-dashes>-<unix-millis>.html.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::ReportError;

static SCHEME_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"https?://").unwrap());

/// File name for a report of `url` created at `timestamp_ms`.
pub fn report_filename(url: &str, timestamp_ms: i64) -> String {
    let stem = SCHEME_RE.replace_all(url, "").replace(|c: char| c == '/' || c == ':', "-");
    format!("{}-{}.html", stem, timestamp_ms)
}

/// Write `html` into `dir`, creating the directory if needed. Returns the file path.
pub fn save_report(dir: &Path, url: &str, html: &str) -> Result<PathBuf, ReportError> {
    fs::create_dir_all(dir).map_err(|e| {
        ReportError::io(
            dir.display().to_string(),
            "Save",
            Some(anyhow::anyhow!("failed to create reports directory: {}", e)),
        )
    })?;

    let path = dir.join(report_filename(url, Utc::now().timestamp_millis()));
    fs::write(&path, html).map_err(|e| {
        ReportError::io(
            path.display().to_string(),
            "Save",
            Some(anyhow::anyhow!("failed to write report: {}", e)),
        )
    })?;

    tracing::info!(path = %path.display(), "saved report to file");
    Ok(path)
}

//! JSON persistence for records and analytics.
//!
//! Files are pretty-printed UTF-8; non-ASCII text (place names, headlines in
//! regional scripts) is written as-is rather than escaped.

use crate::error::PulseError;
use crate::models::{AnalyticsReport, Record};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{error, info, instrument};

async fn write_json<T: Serialize + ?Sized>(
    output_dir: &Path,
    file_name: &str,
    value: &T,
) -> Result<PathBuf, PulseError> {
    let json = serde_json::to_string_pretty(value)?;

    if let Err(e) = fs::create_dir_all(output_dir).await {
        error!(dir = %output_dir.display(), error = %e, "Failed to create output dir");
        return Err(e.into());
    }

    let path = output_dir.join(file_name);
    fs::write(&path, json).await?;
    Ok(path)
}

/// Write a record set to `{output_dir}/{file_name}`.
#[instrument(level = "info", skip_all, fields(dir = %output_dir.as_ref().display(), file = %file_name))]
pub async fn write_records(
    output_dir: impl AsRef<Path>,
    file_name: &str,
    records: &[Record],
) -> Result<PathBuf, PulseError> {
    let path = write_json(output_dir.as_ref(), file_name, records).await?;
    info!(path = %path.display(), count = records.len(), "Wrote records");
    Ok(path)
}

/// Write the analytics report to `{output_dir}/{file_name}`.
#[instrument(level = "info", skip_all, fields(dir = %output_dir.as_ref().display(), file = %file_name))]
pub async fn write_report(
    output_dir: impl AsRef<Path>,
    file_name: &str,
    report: &AnalyticsReport,
) -> Result<PathBuf, PulseError> {
    let path = write_json(output_dir.as_ref(), file_name, report).await?;
    info!(path = %path.display(), total = report.total_articles, "Wrote analytics report");
    Ok(path)
}

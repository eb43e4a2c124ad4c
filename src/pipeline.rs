//! End-to-end run: pick the latest log, aggregate it, write the report.

use crate::config::Config;
use crate::error::Error;
use crate::log::open_log;
use crate::model::{Aggregator, build_statistics};
use crate::render::{report_path, write_report};
use crate::source::find_latest_log;

use anyhow::Context;
use std::fs;
use std::path::PathBuf;

/// How a run ended. Every variant is a successful exit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// No file in the log directory matched the naming pattern.
    NoLogFound,
    /// A non-empty report for the latest log already exists.
    AlreadyReported(PathBuf),
    ReportWritten(PathBuf),
    /// The template was missing or a file was not writable; logged, not fatal.
    ReportNotWritten,
}

fn is_non_empty_file(path: &std::path::Path) -> bool {
    fs::metadata(path).map(|m| m.is_file() && m.len() > 0).unwrap_or(false)
}

pub fn analyze(config: &Config) -> anyhow::Result<Outcome> {
    // 1) Latest log file.
    let log_file = find_latest_log(&config.log_dir)
        .with_context(|| format!("scan log directory {}", config.log_dir.display()))?;
    let Some(log_file) = log_file else {
        tracing::error!(dir = %config.log_dir.display(), "log file not found");
        return Ok(Outcome::NoLogFound);
    };

    // 2) Skip if already done.
    let report = report_path(&config.report_dir, log_file.date);
    if is_non_empty_file(&report) {
        tracing::info!(path = %report.display(), "report already prepared");
        return Ok(Outcome::AlreadyReported(report));
    }

    // 3) Parse + aggregate in one pass.
    tracing::info!(path = %log_file.path.display(), "log file analysis start");
    let mut records = open_log(&log_file.path, log_file.is_compressed)
        .with_context(|| format!("open log file {}", log_file.path.display()))?;

    let mut agg = Aggregator::new();
    while let Some(record) = records.next() {
        let record = record.with_context(|| {
            format!(
                "read {} at line {}",
                log_file.path.display(),
                records.lines_read() + 1
            )
        })?;
        agg.push(record);
    }
    let log = agg.finish();
    tracing::info!(
        lines = log.total_count,
        urls = log.groups.len(),
        total_time = log.total_time,
        "log file parsed"
    );

    // 4) Rank + render.
    let table = build_statistics(&log, config.report_size);
    match write_report(&table, &config.report_template, &report) {
        Ok(()) => Ok(Outcome::ReportWritten(report)),
        Err(Error::TemplateMissing { path }) => {
            tracing::error!(path = %path.display(), "template file not found");
            Ok(Outcome::ReportNotWritten)
        }
        Err(Error::PermissionDenied { path }) => {
            tracing::error!(path = %path.display(), "no permission on file");
            Ok(Outcome::ReportNotWritten)
        }
        Err(err) => Err(err).with_context(|| format!("write report {}", report.display())),
    }
}

use crate::error::{Error, Result};
use crate::model::UrlStatistics;

use chrono::NaiveDate;
use regex::{Captures, Regex};
use serde::Serialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// `report-YYYY.MM.DD.html` inside `dir`.
pub fn report_path(dir: &Path, date: NaiveDate) -> PathBuf {
    dir.join(format!("report-{}.html", date.format("%Y.%m.%d")))
}

/// A table row as embedded in the report, floats rounded to 3 decimals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRow<'a> {
    pub url: &'a str,
    pub count: usize,
    pub count_perc: f64,
    pub time_sum: f64,
    pub time_perc: f64,
    pub time_avg: f64,
    pub time_max: f64,
    pub time_med: f64,
}

fn round3(x: f64) -> f64 {
    (x * 1000.0).round() / 1000.0
}

impl<'a> From<&'a UrlStatistics> for ReportRow<'a> {
    fn from(s: &'a UrlStatistics) -> Self {
        Self {
            url: &s.url,
            count: s.count,
            count_perc: round3(s.count_perc),
            time_sum: round3(s.time_sum),
            time_perc: round3(s.time_perc),
            time_avg: round3(s.time_avg),
            time_max: round3(s.time_max),
            time_med: round3(s.time_med),
        }
    }
}

/// Serialize the table as a JSON array of [`ReportRow`]s.
///
/// `<` is written as `\u003c` so a URL can't close the surrounding
/// `<script>` element; the parsed value is unchanged.
pub fn table_json(table: &[UrlStatistics]) -> Result<String> {
    let rows: Vec<ReportRow<'_>> = table.iter().map(ReportRow::from).collect();
    Ok(serde_json::to_string(&rows)?.replace('<', "\\u003c"))
}

/// Substitute the table into `template`.
///
/// `$table_json` and `${table_json}` are replaced, `$$` collapses to `$`, and
/// any other `$` sequence is left as is. The JSON is inserted literally.
pub fn render_report(template: &str, table: &[UrlStatistics]) -> Result<String> {
    let json = table_json(table)?;
    let re = Regex::new(r"\$(?:(\$)|\{table_json\}|table_json\b)")?;

    let out = re.replace_all(template, |caps: &Captures<'_>| {
        if caps.get(1).is_some() {
            "$".to_string()
        } else {
            json.clone()
        }
    });
    Ok(out.into_owned())
}

fn permission_or_io(err: io::Error, path: &Path) -> Error {
    match err.kind() {
        io::ErrorKind::PermissionDenied => Error::PermissionDenied {
            path: path.to_path_buf(),
        },
        _ => Error::Io(err),
    }
}

/// Render the table through the template file and write the report.
///
/// The template is read before anything is created, so a missing template
/// leaves no empty report behind. The report directory is created if needed.
pub fn write_report(table: &[UrlStatistics], template: &Path, report: &Path) -> Result<()> {
    let text = fs::read_to_string(template).map_err(|err| match err.kind() {
        io::ErrorKind::NotFound => Error::TemplateMissing {
            path: template.to_path_buf(),
        },
        _ => permission_or_io(err, template),
    })?;
    let html = render_report(&text, table)?;

    if let Some(dir) = report.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).map_err(|err| permission_or_io(err, dir))?;
    }
    fs::write(report, html).map_err(|err| permission_or_io(err, report))?;

    tracing::info!(path = %report.display(), rows = table.len(), "report ready");
    Ok(())
}

//! Selection of the most recent access log in a directory.
//!
//! File names look like `nginx-access-ui.log-YYYYMMDD`, optionally with a
//! `.gz` suffix for rotated archives.

use crate::error::Result;

use chrono::NaiveDate;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};

const LOG_NAME_RE: &str = r"^nginx-access-ui\.log-(2\d{3})(0[1-9]|1[0-2])([0-2]\d|3[01])(\.gz)?$";

/// The log file chosen for analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogFile {
    pub path: PathBuf,
    pub date: NaiveDate,
    pub is_compressed: bool,
}

/// Parse a log file name into its date and compression flag.
///
/// Returns `None` for names that do not match the pattern, or whose date does
/// not exist on the calendar (e.g. `20170230`).
pub fn parse_log_name(re: &Regex, name: &str) -> Option<(NaiveDate, bool)> {
    let caps = re.captures(name)?;
    let year: i32 = caps[1].parse().ok()?;
    let month: u32 = caps[2].parse().ok()?;
    let day: u32 = caps[3].parse().ok()?;

    match NaiveDate::from_ymd_opt(year, month, day) {
        Some(date) => Some((date, caps.get(4).is_some())),
        None => {
            tracing::warn!(file = name, "invalid date in log file name, skipped");
            None
        }
    }
}

/// Find the log file with the latest date in `dir`.
///
/// Candidates are visited in name order, and a later date must be strictly
/// greater to replace the current pick. On equal dates the plain file thus
/// wins over its `.gz` twin, whatever order the directory lists them in.
pub fn find_latest_log(dir: &Path) -> Result<Option<LogFile>> {
    let re = Regex::new(LOG_NAME_RE)?;

    let mut names: Vec<(String, PathBuf)> = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        // Follows symlinks.
        if !entry.path().is_file() {
            continue;
        }
        // Non UTF-8 names can't match the pattern.
        if let Some(name) = entry.file_name().to_str() {
            names.push((name.to_string(), entry.path()));
        }
    }
    names.sort();

    let mut latest: Option<LogFile> = None;
    for (name, path) in names {
        let Some((date, is_compressed)) = parse_log_name(&re, &name) else {
            continue;
        };
        if latest.as_ref().is_none_or(|cur| date > cur.date) {
            latest = Some(LogFile {
                path,
                date,
                is_compressed,
            });
        }
    }

    if let Some(found) = &latest {
        tracing::debug!(path = %found.path.display(), date = %found.date, "latest log file");
    }
    Ok(latest)
}

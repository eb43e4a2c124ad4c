//! Field extraction from a single access log line.
//!
//! Expected line shape (nginx `ui_short`):
//! $remote_addr  $remote_user $http_x_real_ip [$time_local] "$request" $status
//! $body_bytes_sent "$http_referer" "$http_user_agent" "$http_x_forwarded_for"
//! "$http_X_REQUEST_ID" "$http_X_RB_USER" $request_time
//!
//! Only the URL inside `"$request"` and the trailing `$request_time` are read.

use std::fmt;

const VERBS: [&str; 2] = ["GET ", "POST "];

/// Why the trailing duration could not be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeFieldError {
    /// The line has no space, so there is no trailing token.
    Missing,
    /// The trailing token is not a float.
    NotNumeric,
    /// The trailing token parsed, but to `inf`/`NaN` (including overflow).
    NotFinite,
}

impl fmt::Display for TimeFieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeFieldError::Missing => write!(f, "time value not found"),
            TimeFieldError::NotNumeric => write!(f, "time value is not a float"),
            TimeFieldError::NotFinite => write!(f, "time value overflow"),
        }
    }
}

/// Locate the request URL: the token after `GET ` (or, failing that, `POST `),
/// up to the next space.
pub fn find_url(line: &str) -> Option<&str> {
    let (pos, verb) = VERBS
        .iter()
        .find_map(|verb| line.find(verb).map(|pos| (pos, verb)))?;
    let rest = &line[pos + verb.len()..];
    let end = rest.find(' ')?;
    Some(&rest[..end])
}

/// Parse the last space-delimited token of the line as a finite float.
pub fn parse_time(line: &str) -> Result<f64, TimeFieldError> {
    let line = line.trim_end();
    let start = line.rfind(' ').ok_or(TimeFieldError::Missing)? + 1;
    let value: f64 = line[start..]
        .parse()
        .map_err(|_| TimeFieldError::NotNumeric)?;
    if !value.is_finite() {
        return Err(TimeFieldError::NotFinite);
    }
    Ok(value)
}

/// Extract the request URL, or `""` if the line has none.
pub fn extract_url(line: &str) -> String {
    match find_url(line) {
        Some(url) => url.to_string(),
        None => {
            tracing::warn!("URL value not found");
            String::new()
        }
    }
}

/// Extract the request duration, or `0.0` if it is absent or invalid.
pub fn extract_time(line: &str) -> f64 {
    parse_time(line).unwrap_or_else(|err| {
        tracing::warn!(reason = %err, "time value not extracted");
        0.0
    })
}

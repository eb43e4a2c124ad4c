use crate::model::aggregate::AggregatedLog;
use serde::Serialize;

/// Timing statistics for one URL. Values are kept at full precision; rounding
/// happens when the report is rendered.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UrlStatistics {
    pub url: String,
    /// Number of requests to this URL.
    pub count: usize,
    /// `count` as a percentage of all requests.
    pub count_perc: f64,
    /// Summed `$request_time` for this URL.
    pub time_sum: f64,
    /// `time_sum` as a percentage of the total request time.
    pub time_perc: f64,
    pub time_avg: f64,
    pub time_max: f64,
    pub time_med: f64,
}

/// Arithmetic mean; `0.0` for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Median, averaging the two middle values for even lengths; `0.0` for an
/// empty slice.
pub fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len().is_multiple_of(2) {
        sorted[mid - 1] / 2.0 + sorted[mid] / 2.0
    } else {
        sorted[mid]
    }
}

/// Build the ranked statistics table.
///
/// Rows are sorted by `time_sum` descending with a stable sort (ties keep the
/// first-seen order of their URLs) and truncated to `report_size`. When the
/// total request count or total time is zero the percentages are undefined, so
/// every row is skipped and a warning is logged. The same applies when the
/// total time, or a URL's summed time, overflows to a non-finite value.
pub fn build_statistics(log: &AggregatedLog, report_size: usize) -> Vec<UrlStatistics> {
    let mut rows: Vec<UrlStatistics> = Vec::with_capacity(log.groups.len());

    for group in &log.groups {
        if log.total_count == 0 || log.total_time == 0.0 {
            tracing::warn!(url = %group.url, "division by zero, URL skipped");
            continue;
        }
        if !log.total_time.is_finite() {
            tracing::warn!(url = %group.url, "total time overflow, URL skipped");
            continue;
        }

        let times = &group.times;
        let count = times.len();
        let time_sum: f64 = times.iter().sum();
        if !time_sum.is_finite() {
            tracing::warn!(url = %group.url, "URL time overflow, URL skipped");
            continue;
        }

        rows.push(UrlStatistics {
            url: group.url.clone(),
            count,
            count_perc: count as f64 / log.total_count as f64 * 100.0,
            time_sum,
            time_perc: time_sum / log.total_time * 100.0,
            time_avg: mean(times),
            time_max: times.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            time_med: median(times),
        });
    }

    rows.sort_by(|a, b| b.time_sum.total_cmp(&a.time_sum));
    rows.truncate(report_size);

    tracing::debug!(
        urls = log.groups.len(),
        rows = rows.len(),
        "statistics built"
    );

    rows
}

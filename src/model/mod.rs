//! Aggregation model: group parsed records by URL and rank them by total time.

pub mod aggregate;
pub mod stats;

pub use aggregate::{AggregatedLog, Aggregator, UrlGroup, aggregate};
pub use stats::{UrlStatistics, build_statistics, mean, median};

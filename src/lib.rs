//! Nginx access log analyzer.
//!
//! Picks the most recent `nginx-access-ui.log-YYYYMMDD[.gz]` file, groups
//! `$request_time` by URL and renders the URLs with the largest total time
//! into an HTML report.

pub mod config;
pub mod error;
pub mod log;
pub mod model;
pub mod pipeline;
pub mod render;
pub mod source;

pub use error::{Error, Result};

//! Log parsing for the nginx `ui_short` access log.

pub mod extract;
pub mod reader;
pub mod record;

pub use extract::{extract_time, extract_url};
pub use reader::{LogRecords, open_log};
pub use record::UrlRecord;

//! Report rendering: statistics table -> JSON -> HTML template.

pub mod html;

pub use html::{ReportRow, render_report, report_path, table_json, write_report};

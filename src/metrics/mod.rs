//! Host information and sweep reporting
//!
//! This module provides:
//! - CPU model, cache size and load average for the report header
//! - Markdown report to stdout
//! - JSON/CSV export

pub mod reporter;
pub mod system_info;

pub use reporter::{
    format_count, format_stage_line, format_throughput, write_csv_file, write_json_file,
    MarkdownReporter, SweepSummary,
};
pub use system_info::SystemInfo;

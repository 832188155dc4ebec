//! Sweep reporter - output formatting and export
//!
//! Supports:
//! - Markdown (stdout, lines end in two spaces to force line breaks)
//! - JSON
//! - CSV

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use super::system_info::SystemInfo;
use crate::benchmark::StageResult;
use crate::workload::ParserEngine;

/// What was benchmarked, for report headers and exports
#[derive(Debug, Clone)]
pub struct SweepSummary {
    pub system: SystemInfo,
    pub engine: ParserEngine,
    pub tasks: u64,
    pub document_bytes: usize,
}

/// Markdown report writer
pub struct MarkdownReporter<W: Write> {
    out: W,
}

impl MarkdownReporter<io::Stdout> {
    /// Reporter writing to stdout
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> MarkdownReporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Host and workload header
    pub fn write_header(&mut self, summary: &SweepSummary) -> io::Result<()> {
        writeln!(self.out, "### {}", summary.system.model_name)?;
        writeln!(self.out, "CPU cores: {}  ", summary.system.cpu_count)?;
        writeln!(self.out, "CPU cache: {}  ", summary.system.cache_size)?;
        writeln!(self.out, "Current system load: {}  ", summary.system.load_average)?;
        writeln!(self.out, "Documents: {}  ", summary.tasks)?;
        writeln!(self.out, "Engine: {}  ", summary.engine)?;
        self.out.flush()
    }

    /// One line per finished stage
    pub fn write_stage(&mut self, result: &StageResult) -> io::Result<()> {
        writeln!(self.out, "{}", format_stage_line(result))?;
        self.out.flush()
    }

    /// Consume the reporter, returning the writer
    pub fn into_inner(self) -> W {
        self.out
    }
}

/// `[4 proc] 1.23 sec  `, flagged when workers were lost
pub fn format_stage_line(result: &StageResult) -> String {
    if result.is_degraded() {
        format!(
            "[{} proc] {:.2} sec ({} workers failed)  ",
            result.worker_count,
            result.elapsed_secs(),
            result.failed_workers
        )
    } else {
        format!(
            "[{} proc] {:.2} sec  ",
            result.worker_count,
            result.elapsed_secs()
        )
    }
}

/// Export the sweep as a JSON value
pub fn to_json(summary: &SweepSummary, results: &[StageResult]) -> serde_json::Value {
    serde_json::json!({
        "system": summary.system,
        "engine": summary.engine.as_str(),
        "tasks": summary.tasks,
        "document_bytes": summary.document_bytes,
        "stages": results.iter().map(|r| {
            serde_json::json!({
                "workers": r.worker_count,
                "elapsed_secs": r.elapsed_secs(),
                "completed": r.completed,
                "failed_workers": r.failed_workers,
                "throughput": r.throughput(),
                "latency": {
                    "mean_us": r.histogram.mean(),
                    "p50_us": r.percentile_us(50.0),
                    "p99_us": r.percentile_us(99.0),
                    "max_us": r.histogram.max()
                }
            })
        }).collect::<Vec<_>>()
    })
}

/// Write the sweep to a JSON file
pub fn write_json_file(
    path: &Path,
    summary: &SweepSummary,
    results: &[StageResult],
) -> io::Result<()> {
    let json = serde_json::to_string_pretty(&to_json(summary, results))
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    let mut file = File::create(path)?;
    writeln!(file, "{}", json)?;
    Ok(())
}

/// CSV header matching [`csv_row`]
pub fn csv_header() -> &'static str {
    "engine,workers,elapsed_secs,completed,failed_workers,throughput,mean_us,p50_us,p99_us,max_us"
}

/// One CSV row per stage
pub fn csv_row(engine: ParserEngine, result: &StageResult) -> String {
    format!(
        "{},{},{:.4},{},{},{:.2},{:.1},{},{},{}",
        engine,
        result.worker_count,
        result.elapsed_secs(),
        result.completed,
        result.failed_workers,
        result.throughput(),
        result.histogram.mean(),
        result.percentile_us(50.0),
        result.percentile_us(99.0),
        result.histogram.max()
    )
}

/// Write the sweep to a CSV file
pub fn write_csv_file(
    path: &Path,
    engine: ParserEngine,
    results: &[StageResult],
) -> io::Result<()> {
    let mut file = File::create(path)?;

    // Write header
    writeln!(file, "{}", csv_header())?;

    // Write rows
    for result in results {
        writeln!(file, "{}", csv_row(engine, result))?;
    }

    Ok(())
}

/// Format throughput without meaningless decimals
/// Examples: 1,234 docs/s
pub fn format_throughput(throughput: f64) -> String {
    format!("{} docs/s", format_count(throughput as u64))
}

/// Format large numbers with thousands separators
/// Examples: 1,234,567 or 987,654
pub fn format_count(value: u64) -> String {
    let s = value.to_string();
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.insert(0, ',');
        }
        result.insert(0, c);
    }
    result
}

//! Command-line argument parsing
//!
//! Arguments are grouped by category for clarity.

use clap::Parser;
use std::path::PathBuf;

use crate::document::{DEFAULT_CACHE_PATH, DEFAULT_DOCUMENT_URL};
use crate::workload::{ParserEngine, DEFAULT_EXPECTED_TITLE};

/// Default number of documents parsed per stage
pub const DEFAULT_TASKS: u64 = 1000;

/// Measure how HTML parsing throughput scales with parallel workers
#[derive(Parser, Debug, Clone)]
#[command(name = "html-scale-bench")]
#[command(version, about, long_about = None)]
pub struct CliArgs {
    // ===== Sweep Parameters =====
    /// Number of documents to parse per stage
    #[arg(short = 'n', long = "tasks-number", default_value_t = DEFAULT_TASKS)]
    pub tasks: u64,

    /// Explicit worker counts to evaluate, replacing the CPU-based plan
    #[arg(short = 'w', long = "workers", value_delimiter = ',')]
    pub workers: Option<Vec<usize>>,

    /// CPU count used to derive the stage plan (0 = auto-detect)
    #[arg(long = "cpus", default_value_t = 0)]
    pub cpus: usize,

    // ===== Workload =====
    /// HTML engine to benchmark
    #[arg(short = 'e', long = "engine", value_enum, default_value_t = ParserEngine::Html5ever)]
    pub engine: ParserEngine,

    /// Text the document title must contain
    #[arg(long = "expected-title", default_value = DEFAULT_EXPECTED_TITLE)]
    pub expected_title: String,

    // ===== Document Options =====
    /// URL of the sample document
    #[arg(long = "url", default_value = DEFAULT_DOCUMENT_URL)]
    pub url: String,

    /// Where the downloaded document is cached
    #[arg(long = "cache-path", default_value = DEFAULT_CACHE_PATH)]
    pub cache_path: PathBuf,

    /// Local HTML file to parse instead of downloading
    #[arg(short = 'd', long = "document")]
    pub document: Option<PathBuf>,

    /// Download timeout in seconds
    #[arg(long = "download-timeout", default_value_t = 30)]
    pub download_timeout_secs: u64,

    // ===== Output Options =====
    /// Write results as JSON to this file
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Write one CSV row per stage to this file
    #[arg(long = "csv")]
    pub csv_output: Option<PathBuf>,

    /// Quiet mode (no progress bars, errors only)
    #[arg(short = 'q', long = "quiet")]
    pub quiet: bool,

    /// Verbose output
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

impl CliArgs {
    /// Parse CLI arguments from command line
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate argument combinations
    pub fn validate(&self) -> Result<(), String> {
        if self.tasks == 0 {
            return Err("--tasks-number must be at least 1".to_string());
        }

        if let Some(ref workers) = self.workers {
            if workers.is_empty() {
                return Err("--workers needs at least one worker count".to_string());
            }
            if workers.contains(&0) {
                return Err("--workers entries must be at least 1".to_string());
            }
        }

        if self.expected_title.is_empty() {
            return Err("--expected-title must not be empty".to_string());
        }

        if self.download_timeout_secs == 0 {
            return Err("--download-timeout must be at least 1 second".to_string());
        }

        if self.quiet && self.verbose {
            return Err("--quiet and --verbose are mutually exclusive".to_string());
        }

        Ok(())
    }

    /// Get effective CPU count (0 = auto-detect)
    pub fn effective_cpus(&self) -> usize {
        if self.cpus == 0 {
            std::thread::available_parallelism()
                .map(|p| p.get())
                .unwrap_or(1)
        } else {
            self.cpus
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_args() {
        let args = CliArgs::parse_from(["test"]);
        assert_eq!(args.tasks, 1000);
        assert_eq!(args.workers, None);
        assert_eq!(args.engine, ParserEngine::Html5ever);
        assert_eq!(args.expected_title, "reddit");
        assert_eq!(args.url, DEFAULT_DOCUMENT_URL);
        assert_eq!(args.cache_path, PathBuf::from(".reddit.html"));
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_worker_list() {
        let args = CliArgs::parse_from(["test", "-n", "50", "--workers", "1,2,8"]);
        assert_eq!(args.tasks, 50);
        assert_eq!(args.workers, Some(vec![1, 2, 8]));
    }

    #[test]
    fn test_engine_selection() {
        let args = CliArgs::parse_from(["test", "--engine", "scraper"]);
        assert_eq!(args.engine, ParserEngine::Scraper);
        let args = CliArgs::parse_from(["test", "-e", "tl"]);
        assert_eq!(args.engine, ParserEngine::Tl);
    }

    #[test]
    fn test_validation_zero_tasks() {
        let args = CliArgs::parse_from(["test", "-n", "0"]);
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_zero_worker() {
        let args = CliArgs::parse_from(["test", "--workers", "1,0"]);
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_quiet_and_verbose() {
        let args = CliArgs::parse_from(["test", "-q", "-v"]);
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_effective_cpus() {
        let args = CliArgs::parse_from(["test", "--cpus", "6"]);
        assert_eq!(args.effective_cpus(), 6);
        let args = CliArgs::parse_from(["test"]);
        assert!(args.effective_cpus() >= 1);
    }
}

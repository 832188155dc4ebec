//! Sweep configuration derived from CLI arguments

use std::path::PathBuf;
use std::time::Duration;

use super::cli::CliArgs;
use crate::benchmark::StagePlan;
use crate::document::DocumentSource;
use crate::workload::ParserEngine;

/// Complete sweep configuration
///
/// Passed explicitly to everything that needs it; nothing reads the CPU
/// count or the document from ambient state.
#[derive(Debug, Clone)]
pub struct SweepConfig {
    // Sweep
    pub tasks: u64,
    pub cpu_count: usize,
    pub stages: StagePlan,

    // Workload
    pub engine: ParserEngine,
    pub expected_title: String,
    pub source: DocumentSource,

    // Output
    pub output_path: Option<PathBuf>,
    pub csv_output: Option<PathBuf>,
    pub quiet: bool,
    pub verbose: bool,
}

impl SweepConfig {
    /// Create configuration from CLI arguments
    pub fn from_cli(args: &CliArgs) -> Result<Self, String> {
        // Validate first
        args.validate()?;

        let cpu_count = args.effective_cpus();

        // Explicit worker list wins over the CPU-derived plan
        let stages = match args.workers {
            Some(ref workers) => StagePlan::from_explicit(workers).map_err(|e| e.to_string())?,
            None => StagePlan::from_cpu_count(cpu_count),
        };

        let source = match args.document {
            Some(ref path) => DocumentSource::Local(path.clone()),
            None => DocumentSource::Cached {
                url: args.url.clone(),
                cache_path: args.cache_path.clone(),
                timeout: Duration::from_secs(args.download_timeout_secs),
            },
        };

        Ok(Self {
            tasks: args.tasks,
            cpu_count,
            stages,

            engine: args.engine,
            expected_title: args.expected_title.clone(),
            source,

            output_path: args.output.clone(),
            csv_output: args.csv_output.clone(),
            quiet: args.quiet,
            verbose: args.verbose,
        })
    }

    /// Whether progress bars should be drawn
    pub fn show_progress(&self) -> bool {
        !self.quiet
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::path::Path;

    #[test]
    fn test_default_plan_from_cpus() {
        let args = CliArgs::parse_from(["test", "--cpus", "4"]);
        let config = SweepConfig::from_cli(&args).unwrap();

        assert_eq!(config.cpu_count, 4);
        assert_eq!(config.stages.stages(), &[1, 2, 3, 4, 5]);
        assert_eq!(config.tasks, 1000);
        assert!(config.show_progress());
        assert!(matches!(config.source, DocumentSource::Cached { .. }));
    }

    #[test]
    fn test_explicit_workers_override_plan() {
        let args = CliArgs::parse_from(["test", "--cpus", "4", "--workers", "3,1,3"]);
        let config = SweepConfig::from_cli(&args).unwrap();
        assert_eq!(config.stages.stages(), &[3, 1]);
    }

    #[test]
    fn test_local_document() {
        let args = CliArgs::parse_from(["test", "--document", "page.html", "-q"]);
        let config = SweepConfig::from_cli(&args).unwrap();

        assert_eq!(config.source.path(), Path::new("page.html"));
        assert!(matches!(config.source, DocumentSource::Local(_)));
        assert!(!config.show_progress());
    }

    #[test]
    fn test_invalid_args_rejected() {
        let args = CliArgs::parse_from(["test", "-n", "0"]);
        assert!(SweepConfig::from_cli(&args).is_err());
    }
}

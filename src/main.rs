//! html-scale-bench - HTML parsing scalability benchmark
//!
//! Parses one sample document N times per stage, sweeping the number of
//! parallel workers, and prints a markdown report of elapsed time per stage.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{error, info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use html_scale_bench::benchmark::{SchedulerOptions, SweepScheduler};
use html_scale_bench::config::{CliArgs, SweepConfig};
use html_scale_bench::metrics::{
    format_throughput, write_csv_file, write_json_file, MarkdownReporter, SweepSummary,
    SystemInfo,
};
use html_scale_bench::workload::ParseAndVerify;

fn setup_logging(verbose: bool, quiet: bool) {
    let level = if quiet {
        Level::ERROR
    } else if verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

fn run() -> Result<()> {
    // Parse CLI arguments
    let args = CliArgs::parse_args();

    // Setup logging
    setup_logging(args.verbose, args.quiet);

    // Build configuration
    let config = SweepConfig::from_cli(&args)
        .map_err(|e| anyhow::anyhow!("Configuration error: {}", e))?;

    // Load the sample document (downloads on first run)
    let document = Arc::new(config.source.load().context("Failed to load document")?);
    info!("{}", document.summary());

    let item = Arc::new(ParseAndVerify::new(
        config.engine,
        Arc::clone(&document),
        config.expected_title.clone(),
    )?);

    let summary = SweepSummary {
        system: SystemInfo::collect(config.cpu_count),
        engine: config.engine,
        tasks: config.tasks,
        document_bytes: document.byte_len(),
    };

    let mut reporter = MarkdownReporter::stdout();
    reporter.write_header(&summary)?;

    let scheduler = SweepScheduler::new(SchedulerOptions {
        show_progress: config.show_progress(),
    });

    let results = scheduler.run_sweep_with(
        item,
        config.tasks,
        config.stages.stages(),
        |stage| {
            if let Err(e) = reporter.write_stage(stage) {
                warn!("Failed to write report line: {}", e);
            }
            info!(
                "{} workers: {}",
                stage.worker_count,
                format_throughput(stage.throughput())
            );
        },
    )?;

    // Export to JSON if requested
    if let Some(ref output_path) = config.output_path {
        info!("Writing results to: {:?}", output_path);
        write_json_file(output_path, &summary, &results)
            .with_context(|| format!("Failed to write JSON to {:?}", output_path))?;
    }

    // Export to CSV if requested
    if let Some(ref csv_path) = config.csv_output {
        info!("Writing CSV to: {:?}", csv_path);
        write_csv_file(csv_path, config.engine, &results)
            .with_context(|| format!("Failed to write CSV to {:?}", csv_path))?;
    }

    let degraded = results.iter().filter(|r| r.is_degraded()).count();
    if degraded > 0 {
        warn!(
            "{} of {} stages lost workers to failed parses; their timings are unreliable",
            degraded,
            results.len()
        );
    }

    Ok(())
}

fn main() {
    if let Err(e) = run() {
        error!("Error: {:#}", e);
        std::process::exit(1);
    }
}

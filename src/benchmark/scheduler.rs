//! Scalability sweep scheduler
//!
//! Runs a work item `total_tasks` times per stage, once per requested worker
//! count. Stages are strictly sequential; the workers of a stage run in
//! parallel and drain one shared task counter.

use std::collections::HashSet;
use std::io;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use hdrhistogram::Histogram;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info, warn};

use super::counters::TaskCounter;
use super::worker::{new_latency_histogram, SweepWorker, WorkerFailure, WorkerResult};
use crate::utils::{BenchError, Result};
use crate::workload::WorkItem;

/// Timing of one stage
///
/// Never mutated after the scheduler hands it out.
#[derive(Debug, Clone)]
pub struct StageResult {
    /// Workers spawned for the stage
    pub worker_count: usize,
    /// Wall-clock time from first spawn to last join
    pub elapsed: Duration,
    /// Successful invocations across all workers
    pub completed: u64,
    /// Workers that stopped on a failed invocation
    pub failed_workers: usize,
    /// Merged per-invocation latency histogram (microseconds)
    pub histogram: Histogram<u64>,
}

impl StageResult {
    /// Elapsed time in seconds
    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed.as_secs_f64()
    }

    /// Successful invocations per second
    pub fn throughput(&self) -> f64 {
        let secs = self.elapsed_secs();
        if secs > 0.0 {
            self.completed as f64 / secs
        } else {
            0.0
        }
    }

    /// True when workers were lost and the timing is not comparable
    pub fn is_degraded(&self) -> bool {
        self.failed_workers > 0
    }

    /// Get percentile invocation latency in microseconds
    pub fn percentile_us(&self, p: f64) -> u64 {
        self.histogram.value_at_percentile(p)
    }
}

/// Body of one worker thread
pub type WorkerJob = Box<dyn FnOnce() -> WorkerResult + Send>;

/// Start a named OS thread for worker `worker_id`
pub fn spawn_named_worker(
    worker_id: usize,
    job: WorkerJob,
) -> io::Result<JoinHandle<WorkerResult>> {
    thread::Builder::new()
        .name(format!("sweep-worker-{}", worker_id))
        .spawn(job)
}

/// Scheduler behavior switches
#[derive(Debug, Clone, Default)]
pub struct SchedulerOptions {
    /// Draw a progress bar while a stage runs
    pub show_progress: bool,
}

/// Scalability sweep scheduler
#[derive(Debug, Clone, Default)]
pub struct SweepScheduler {
    options: SchedulerOptions,
}

impl SweepScheduler {
    pub fn new(options: SchedulerOptions) -> Self {
        Self { options }
    }

    /// Run every stage and collect the results in stage order
    ///
    /// Worker counts already evaluated in this sweep are skipped.
    pub fn run_sweep<W>(
        &self,
        item: Arc<W>,
        total_tasks: u64,
        stage_worker_counts: &[usize],
    ) -> Result<Vec<StageResult>>
    where
        W: WorkItem + ?Sized + 'static,
    {
        self.run_sweep_with(item, total_tasks, stage_worker_counts, |_| {})
    }

    /// Same as [`run_sweep`](Self::run_sweep), calling `on_stage` as soon as
    /// each stage finishes
    pub fn run_sweep_with<W, F>(
        &self,
        item: Arc<W>,
        total_tasks: u64,
        stage_worker_counts: &[usize],
        mut on_stage: F,
    ) -> Result<Vec<StageResult>>
    where
        W: WorkItem + ?Sized + 'static,
        F: FnMut(&StageResult),
    {
        if total_tasks == 0 {
            return Err(BenchError::Config(
                "task count must be at least 1".to_string(),
            ));
        }
        if stage_worker_counts.contains(&0) {
            return Err(BenchError::Config(
                "worker counts must be at least 1".to_string(),
            ));
        }

        let mut seen = HashSet::with_capacity(stage_worker_counts.len());
        let mut results = Vec::with_capacity(stage_worker_counts.len());

        for &worker_count in stage_worker_counts {
            if !seen.insert(worker_count) {
                warn!("Skipping duplicate stage of {} workers", worker_count);
                continue;
            }

            let result = self.run_stage(&item, total_tasks, worker_count)?;
            on_stage(&result);
            results.push(result);
        }

        Ok(results)
    }

    /// Run a single stage of `worker_count` workers
    pub fn run_stage<W>(
        &self,
        item: &Arc<W>,
        total_tasks: u64,
        worker_count: usize,
    ) -> Result<StageResult>
    where
        W: WorkItem + ?Sized + 'static,
    {
        if worker_count == 0 {
            return Err(BenchError::Config(
                "worker counts must be at least 1".to_string(),
            ));
        }

        info!(
            "Stage: {} workers, {} tasks, {}",
            worker_count,
            total_tasks,
            item.name()
        );

        let counter = Arc::new(TaskCounter::new(total_tasks));

        let start_time = Instant::now();

        let handles = Self::spawn_workers(item, &counter, worker_count, spawn_named_worker)?;

        let progress = if self.options.show_progress {
            let counter_clone = Arc::clone(&counter);
            let spawned = thread::Builder::new()
                .name("sweep-progress".into())
                .spawn(move || Self::report_progress(&counter_clone, worker_count));
            match spawned {
                Ok(handle) => Some(handle),
                Err(e) => {
                    warn!("Progress reporter unavailable: {}", e);
                    None
                }
            }
        } else {
            None
        };

        let results = Self::join_workers(handles);
        let elapsed = start_time.elapsed();

        // Stop the progress reporter
        counter.signal_shutdown();
        if let Some(handle) = progress {
            let _ = handle.join();
        }

        let stage = Self::merge_worker_results(worker_count, results, elapsed);

        info!(
            "Stage: {} workers finished in {:.2}s ({} ok, {} workers failed)",
            worker_count,
            stage.elapsed_secs(),
            stage.completed,
            stage.failed_workers
        );

        Ok(stage)
    }

    /// Start `worker_count` workers on `counter` through `spawn`
    ///
    /// If any spawn fails the counter is shut down, the workers already
    /// started are joined, and the stage is abandoned.
    pub fn spawn_workers<W, S>(
        item: &Arc<W>,
        counter: &Arc<TaskCounter>,
        worker_count: usize,
        mut spawn: S,
    ) -> Result<Vec<JoinHandle<WorkerResult>>>
    where
        W: WorkItem + ?Sized + 'static,
        S: FnMut(usize, WorkerJob) -> io::Result<JoinHandle<WorkerResult>>,
    {
        let mut handles = Vec::with_capacity(worker_count);

        for worker_id in 0..worker_count {
            let worker = SweepWorker::new(worker_id, Arc::clone(item));
            let counter_clone = Arc::clone(counter);

            let job: WorkerJob = Box::new(move || worker.run(counter_clone));

            match spawn(worker_id, job) {
                Ok(handle) => handles.push(handle),
                Err(source) => {
                    // Partial stages produce misleading numbers: stop and bail
                    counter.signal_shutdown();
                    Self::join_workers(handles);
                    return Err(BenchError::Spawn {
                        worker_id,
                        worker_count,
                        source,
                    });
                }
            }
        }

        Ok(handles)
    }

    /// Wait for workers; a thread that died outside the invocation guard
    /// counts as a failed worker
    fn join_workers(handles: Vec<JoinHandle<WorkerResult>>) -> Vec<WorkerResult> {
        handles
            .into_iter()
            .enumerate()
            .map(|(worker_id, handle)| {
                handle.join().unwrap_or_else(|payload| {
                    WorkerResult::lost(worker_id, WorkerFailure::from_panic(payload))
                })
            })
            .collect()
    }

    /// Merge results from the workers of one stage
    fn merge_worker_results(
        worker_count: usize,
        results: Vec<WorkerResult>,
        elapsed: Duration,
    ) -> StageResult {
        let mut histogram = new_latency_histogram();
        let mut completed = 0u64;
        let mut failed_workers = 0usize;

        for result in results {
            histogram.add(&result.histogram).ok();
            completed += result.completed;
            if let Some(failure) = result.failure {
                failed_workers += 1;
                debug!("Worker {} failed: {}", result.worker_id, failure);
            }
        }

        StageResult {
            worker_count,
            elapsed,
            completed,
            failed_workers,
            histogram,
        }
    }

    /// Report progress while a stage runs
    fn report_progress(counter: &TaskCounter, worker_count: usize) {
        let pb = ProgressBar::new(counter.total());
        if let Ok(style) = ProgressStyle::default_bar()
            .template(
                "[{prefix}] {spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({msg})",
            )
        {
            pb.set_style(style.progress_chars("#>-"));
        }
        pb.set_prefix(format!("{} proc", worker_count));

        let mut last_completed = 0u64;
        let mut last_time = Instant::now();

        while !counter.is_shutdown() {
            let (completed, _) = counter.progress();
            pb.set_position(completed);

            let now = Instant::now();
            let interval = now.duration_since(last_time).as_secs_f64();
            if interval >= 0.5 {
                let throughput = (completed - last_completed) as f64 / interval;
                pb.set_message(format!("{:.0} docs/s", throughput));
                last_completed = completed;
                last_time = now;
            }

            thread::sleep(Duration::from_millis(100));
        }

        pb.finish_and_clear();
    }
}

/// Run a sweep with default options
pub fn run_sweep<W>(
    item: Arc<W>,
    total_tasks: u64,
    stage_worker_counts: &[usize],
) -> Result<Vec<StageResult>>
where
    W: WorkItem + ?Sized + 'static,
{
    SweepScheduler::default().run_sweep(item, total_tasks, stage_worker_counts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::WorkError;
    use std::sync::atomic::{AtomicU64, Ordering};

    struct Tally {
        calls: AtomicU64,
    }

    impl WorkItem for Tally {
        fn name(&self) -> &str {
            "tally"
        }

        fn execute(&self) -> std::result::Result<(), WorkError> {
            self.calls.fetch_add(1, Ordering::Relaxed);
            Ok(())
        }
    }

    #[test]
    fn test_stage_runs_exact_task_count() {
        let item = Arc::new(Tally {
            calls: AtomicU64::new(0),
        });
        let scheduler = SweepScheduler::default();

        let stage = scheduler.run_stage(&item, 500, 4).unwrap();

        assert_eq!(stage.worker_count, 4);
        assert_eq!(stage.completed, 500);
        assert_eq!(stage.failed_workers, 0);
        assert!(!stage.is_degraded());
        assert_eq!(stage.histogram.len(), 500);
        assert_eq!(item.calls.load(Ordering::Relaxed), 500);
    }

    #[test]
    fn test_more_workers_than_tasks() {
        let item = Arc::new(Tally {
            calls: AtomicU64::new(0),
        });

        let stage = SweepScheduler::default().run_stage(&item, 3, 16).unwrap();

        assert_eq!(stage.completed, 3);
        assert_eq!(item.calls.load(Ordering::Relaxed), 3);
    }

    #[test]
    fn test_zero_inputs_rejected() {
        let item = Arc::new(Tally {
            calls: AtomicU64::new(0),
        });
        let scheduler = SweepScheduler::default();

        assert!(matches!(
            scheduler.run_sweep(Arc::clone(&item), 0, &[1]),
            Err(BenchError::Config(_))
        ));
        assert!(matches!(
            scheduler.run_sweep(Arc::clone(&item), 10, &[1, 0]),
            Err(BenchError::Config(_))
        ));
        // Nothing ran
        assert_eq!(item.calls.load(Ordering::Relaxed), 0);
    }

    #[test]
    fn test_duplicate_stages_skipped() {
        let item = Arc::new(Tally {
            calls: AtomicU64::new(0),
        });

        let results = run_sweep(Arc::clone(&item), 10, &[2, 1, 2, 1, 3]).unwrap();

        let counts: Vec<usize> = results.iter().map(|r| r.worker_count).collect();
        assert_eq!(counts, vec![2, 1, 3]);
        assert_eq!(item.calls.load(Ordering::Relaxed), 30);
    }

    #[test]
    fn test_on_stage_called_in_order() {
        let item = Arc::new(Tally {
            calls: AtomicU64::new(0),
        });
        let mut seen = Vec::new();

        SweepScheduler::default()
            .run_sweep_with(item, 20, &[1, 4, 2], |r| seen.push(r.worker_count))
            .unwrap();

        assert_eq!(seen, vec![1, 4, 2]);
    }

    #[test]
    fn test_progress_reporter_does_not_change_counts() {
        let item = Arc::new(Tally {
            calls: AtomicU64::new(0),
        });
        let scheduler = SweepScheduler::new(SchedulerOptions {
            show_progress: true,
        });

        let results = scheduler.run_sweep(Arc::clone(&item), 200, &[1, 2]).unwrap();

        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|r| r.completed == 200));
    }

    #[test]
    fn test_spawn_failure_aborts_stage() {
        let item = Arc::new(Tally {
            calls: AtomicU64::new(0),
        });
        let counter = Arc::new(TaskCounter::new(1_000));

        let outcome = SweepScheduler::spawn_workers(&item, &counter, 4, |worker_id, job| {
            if worker_id == 2 {
                Err(io::Error::new(io::ErrorKind::WouldBlock, "no more threads"))
            } else {
                spawn_named_worker(worker_id, job)
            }
        });

        match outcome {
            Err(BenchError::Spawn {
                worker_id,
                worker_count,
                source,
            }) => {
                assert_eq!(worker_id, 2);
                assert_eq!(worker_count, 4);
                assert_eq!(source.kind(), io::ErrorKind::WouldBlock);
            }
            other => panic!("expected spawn error, got {:?}", other.map(|h| h.len())),
        }
        assert!(counter.is_shutdown());
        // Started workers were joined and released their handle on the item
        assert_eq!(Arc::strong_count(&item), 1);
        assert_eq!(Arc::strong_count(&counter), 1);
    }

    #[test]
    fn test_spawn_workers_starts_every_worker() {
        let item = Arc::new(Tally {
            calls: AtomicU64::new(0),
        });
        let counter = Arc::new(TaskCounter::new(60));
        let mut spawned = Vec::new();

        let handles = SweepScheduler::spawn_workers(&item, &counter, 3, |worker_id, job| {
            spawned.push(worker_id);
            spawn_named_worker(worker_id, job)
        })
        .unwrap();

        assert_eq!(spawned, vec![0, 1, 2]);
        let results = SweepScheduler::join_workers(handles);
        assert_eq!(results.iter().map(|r| r.completed).sum::<u64>(), 60);
        assert_eq!(item.calls.load(Ordering::Relaxed), 60);
    }

    #[test]
    fn test_throughput() {
        let stage = StageResult {
            worker_count: 2,
            elapsed: Duration::from_secs(2),
            completed: 100,
            failed_workers: 0,
            histogram: new_latency_histogram(),
        };
        assert!((stage.throughput() - 50.0).abs() < f64::EPSILON);

        let instant = StageResult {
            elapsed: Duration::ZERO,
            ..stage
        };
        assert_eq!(instant.throughput(), 0.0);
    }
}

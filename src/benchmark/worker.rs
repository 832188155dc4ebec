//! Sweep worker thread implementation
//!
//! Each worker owns its latency histogram exclusively. The only
//! synchronization point is the stage's task counter.

use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::{Duration, Instant};

use hdrhistogram::Histogram;
use tracing::debug;

use super::counters::TaskCounter;
use crate::utils::WorkError;
use crate::workload::WorkItem;

/// Highest recordable invocation latency (1 hour, in microseconds)
const MAX_LATENCY_US: u64 = 3_600_000_000;

/// Create an empty per-invocation latency histogram (microseconds)
pub fn new_latency_histogram() -> Histogram<u64> {
    Histogram::new_with_bounds(1, MAX_LATENCY_US, 3).expect("valid histogram bounds")
}

/// Whole microseconds, saturating at `u64::MAX`
fn latency_micros(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_micros()).unwrap_or(u64::MAX)
}

/// Why a worker stopped before the counter drained
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkerFailure {
    /// The work item returned an error
    Error(WorkError),
    /// The work item panicked
    Panicked(String),
}

impl fmt::Display for WorkerFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Error(e) => write!(f, "{}", e),
            Self::Panicked(msg) => write!(f, "panicked: {}", msg),
        }
    }
}

impl WorkerFailure {
    /// Build from a caught panic payload
    pub fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let msg = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "unknown panic payload".to_string()
        };
        Self::Panicked(msg)
    }
}

/// Result from a worker thread
pub struct WorkerResult {
    /// Worker ID within its stage
    pub worker_id: usize,
    /// Local histogram of successful invocation latencies (microseconds)
    pub histogram: Histogram<u64>,
    /// Successful invocations
    pub completed: u64,
    /// Set when the worker stopped on a failed invocation
    pub failure: Option<WorkerFailure>,
}

impl WorkerResult {
    /// Result for a worker whose thread died outside the invocation guard
    pub fn lost(worker_id: usize, failure: WorkerFailure) -> Self {
        Self {
            worker_id,
            histogram: new_latency_histogram(),
            completed: 0,
            failure: Some(failure),
        }
    }
}

/// One worker of a sweep stage
pub struct SweepWorker<W: ?Sized> {
    id: usize,
    item: Arc<W>,
}

impl<W: WorkItem + ?Sized> SweepWorker<W> {
    pub fn new(id: usize, item: Arc<W>) -> Self {
        Self { id, item }
    }

    /// Drain the counter until it reaches zero or an invocation fails
    pub fn run(self, counter: Arc<TaskCounter>) -> WorkerResult {
        let mut histogram = new_latency_histogram();
        let mut completed = 0u64;
        let mut failure = None;

        while counter.claim().is_some() {
            let started = Instant::now();
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.item.execute()));
            let latency_us = latency_micros(started.elapsed());

            match outcome {
                Ok(Ok(())) => {
                    histogram.saturating_record(latency_us.max(1));
                    completed += 1;
                    counter.record_completed();
                }
                Ok(Err(e)) => {
                    failure = Some(WorkerFailure::Error(e));
                    break;
                }
                Err(payload) => {
                    failure = Some(WorkerFailure::from_panic(payload));
                    break;
                }
            }
        }

        if let Some(ref f) = failure {
            debug!(
                "Worker {}: stopped after {} invocations of {}: {}",
                self.id,
                completed,
                self.item.name(),
                f
            );
        }

        WorkerResult {
            worker_id: self.id,
            histogram,
            completed,
            failure,
        }
    }
}

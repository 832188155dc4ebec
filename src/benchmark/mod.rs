//! Sweep scheduling and workers
//!
//! This module provides the multi-threaded sweep execution system:
//! - TaskCounter: Lock-guarded countdown shared by the workers of a stage
//! - SweepWorker: Drains the counter, invoking the work item per claim
//! - SweepScheduler: Runs stages in order and times each one
//! - StagePlan: Which worker counts to evaluate

pub mod counters;
pub mod scheduler;
pub mod stages;
pub mod worker;

pub use counters::TaskCounter;
pub use scheduler::{
    run_sweep, spawn_named_worker, SchedulerOptions, StageResult, SweepScheduler, WorkerJob,
};
pub use stages::{dedupe_stages, StagePlan, StageSpec, DEFAULT_STAGES};
pub use worker::{new_latency_histogram, SweepWorker, WorkerFailure, WorkerResult};

//! html-scale-bench library
//!
//! Measures how HTML parsing throughput scales with the number of parallel
//! workers. The reusable core is the sweep scheduler in [`benchmark`]; the
//! parsing engines are plugged in as [`workload::WorkItem`]s.

pub mod benchmark;
pub mod config;
pub mod document;
pub mod metrics;
pub mod utils;
pub mod workload;

//! Stage plan: which worker counts a sweep evaluates
//!
//! The default plan runs one worker, then fractions and multiples of the CPU
//! count. Fractions round half to even, so 2.5 CPUs becomes 2 workers and
//! 7.5 becomes 8. Counts that round to zero are dropped and collisions run
//! only once.

use std::collections::HashSet;

use crate::utils::{BenchError, Result};

/// One entry of the stage multiplier list
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StageSpec {
    /// Exactly one worker, regardless of CPU count
    Single,
    /// `cpu_count * factor` workers, rounded half to even
    CpuFraction(f64),
}

impl StageSpec {
    /// Resolve to a worker count for `cpu_count` CPUs
    pub fn worker_count(&self, cpu_count: usize) -> usize {
        match *self {
            Self::Single => 1,
            Self::CpuFraction(factor) => {
                let workers = (cpu_count as f64 * factor).round_ties_even();
                if workers <= 0.0 {
                    0
                } else {
                    workers as usize
                }
            }
        }
    }
}

/// Default sweep: 1 worker, then 25%, 50%, 75%, 100% and 120% of the CPUs
pub const DEFAULT_STAGES: [StageSpec; 6] = [
    StageSpec::Single,
    StageSpec::CpuFraction(0.25),
    StageSpec::CpuFraction(0.5),
    StageSpec::CpuFraction(0.75),
    StageSpec::CpuFraction(1.0),
    StageSpec::CpuFraction(1.2),
];

/// Ordered, de-duplicated list of positive worker counts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagePlan {
    stages: Vec<usize>,
}

impl StagePlan {
    /// Default plan for a machine with `cpu_count` CPUs
    pub fn from_cpu_count(cpu_count: usize) -> Self {
        Self::with_specs(cpu_count, &DEFAULT_STAGES)
    }

    /// Plan from an arbitrary multiplier list
    pub fn with_specs(cpu_count: usize, specs: &[StageSpec]) -> Self {
        let counts = specs
            .iter()
            .map(|spec| spec.worker_count(cpu_count))
            .filter(|&count| count > 0);
        Self {
            stages: dedupe_stages(counts),
        }
    }

    /// Plan from explicit worker counts (e.g. `--workers 1,2,8`)
    pub fn from_explicit(counts: &[usize]) -> Result<Self> {
        if counts.is_empty() {
            return Err(BenchError::Config(
                "worker list must not be empty".to_string(),
            ));
        }
        if counts.contains(&0) {
            return Err(BenchError::Config(
                "worker counts must be at least 1".to_string(),
            ));
        }
        Ok(Self {
            stages: dedupe_stages(counts.iter().copied()),
        })
    }

    /// Worker counts in execution order
    pub fn stages(&self) -> &[usize] {
        &self.stages
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }
}

/// Remove repeated worker counts, keeping the first occurrence
pub fn dedupe_stages(counts: impl IntoIterator<Item = usize>) -> Vec<usize> {
    let mut seen = HashSet::new();
    counts.into_iter().filter(|c| seen.insert(*c)).collect()
}

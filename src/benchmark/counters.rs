//! Shared task counter for a single sweep stage
//!
//! The remaining-task countdown is the ONLY gate between worker threads.
//! The completion tally is a relaxed atomic read by the progress reporter;
//! it never decides who runs next. Worker failures travel back through
//! each worker's join result instead.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use parking_lot::Mutex;

/// Countdown of remaining work items for one stage
///
/// Created fresh per stage and dropped once every worker of that stage has
/// been joined.
pub struct TaskCounter {
    /// Tasks not yet claimed; read-test-decrement happens under this lock
    remaining: Mutex<u64>,

    /// Invocations that returned successfully
    completed: AtomicU64,

    /// Stop signal (spawn failure, progress reporter teardown)
    shutdown: AtomicBool,

    /// Initial task count
    total: u64,
}

impl TaskCounter {
    /// Create a counter holding `total` unclaimed tasks
    pub fn new(total: u64) -> Self {
        Self {
            remaining: Mutex::new(total),
            completed: AtomicU64::new(0),
            shutdown: AtomicBool::new(false),
            total,
        }
    }

    /// Claim one task
    ///
    /// Returns the zero-based claim index, or None once the counter has
    /// reached zero or shutdown was signaled. Each index in `0..total` is
    /// handed out exactly once.
    #[inline]
    pub fn claim(&self) -> Option<u64> {
        if self.is_shutdown() {
            return None;
        }

        let mut remaining = self.remaining.lock();
        if *remaining == 0 {
            return None;
        }
        *remaining -= 1;
        Some(self.total - *remaining - 1)
    }

    /// Tasks not yet claimed
    pub fn remaining(&self) -> u64 {
        *self.remaining.lock()
    }

    /// Tasks claimed so far
    pub fn claimed(&self) -> u64 {
        self.total - self.remaining()
    }

    /// Initial task count
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Record a successful invocation
    #[inline]
    pub fn record_completed(&self) {
        self.completed.fetch_add(1, Ordering::Relaxed);
    }

    /// Successful invocations so far
    pub fn completed(&self) -> u64 {
        self.completed.load(Ordering::Relaxed)
    }

    /// Signal shutdown; subsequent claims return None
    pub fn signal_shutdown(&self) {
        self.shutdown.store(true, Ordering::SeqCst);
    }

    /// Check if shutdown has been signaled
    #[inline]
    pub fn is_shutdown(&self) -> bool {
        self.shutdown.load(Ordering::Relaxed)
    }

    /// Current progress as (completed, claimed)
    pub fn progress(&self) -> (u64, u64) {
        (self.completed(), self.claimed())
    }
}

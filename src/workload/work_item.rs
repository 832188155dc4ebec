//! Unit of benchmarked work
//!
//! The scheduler only cares whether an invocation succeeded. What the work
//! item actually does (parse a document, verify its title) is opaque to it.

use crate::utils::WorkError;

/// A single benchmarked operation, invoked concurrently from every worker
/// of a stage
///
/// Implementations must not share mutable state between invocations; the
/// stage's task counter is the only coordination point.
pub trait WorkItem: Send + Sync {
    /// Short label used in logs and reports
    fn name(&self) -> &str {
        "work-item"
    }

    /// Perform one invocation
    ///
    /// An error terminates the calling worker; the stage carries on with
    /// the remaining workers.
    fn execute(&self) -> Result<(), WorkError>;
}

impl<F> WorkItem for F
where
    F: Fn() -> Result<(), WorkError> + Send + Sync,
{
    fn execute(&self) -> Result<(), WorkError> {
        self()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};

    #[test]
    fn test_closure_is_work_item() {
        let calls = AtomicU64::new(0);
        let item = || -> Result<(), WorkError> {
            calls.fetch_add(1, Ordering::Relaxed);
            Ok(())
        };

        assert_eq!(item.name(), "work-item");
        assert!(WorkItem::execute(&item).is_ok());
        assert!(WorkItem::execute(&item).is_ok());
        assert_eq!(calls.load(Ordering::Relaxed), 2);
    }

    #[test]
    fn test_closure_error_passes_through() {
        let item = || -> Result<(), WorkError> {
            Err(WorkError::Verification("no title".to_string()))
        };
        assert_eq!(
            WorkItem::execute(&item),
            Err(WorkError::Verification("no title".to_string()))
        );
    }
}

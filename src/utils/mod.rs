//! Utility modules

pub mod error;

pub use error::{BenchError, DocumentError, Result, WorkError};

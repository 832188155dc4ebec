//! Error types for html-scale-bench

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Top-level application error
#[derive(Error, Debug)]
pub enum BenchError {
    #[error("Configuration error: {0}")]
    Config(String),

    /// A worker thread could not be started; the sweep is aborted.
    #[error("Failed to spawn worker {worker_id} of {worker_count}: {source}")]
    Spawn {
        worker_id: usize,
        worker_count: usize,
        source: io::Error,
    },

    #[error("Document error: {0}")]
    Document(#[from] DocumentError),
}

/// Sample document loading errors
#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("Failed to download {url}: {source}")]
    DownloadFailed {
        url: String,
        source: reqwest::Error,
    },

    #[error("Unexpected HTTP status {status} from {url}")]
    BadStatus { url: String, status: u16 },

    #[error("Failed to read document {path:?}: {source}")]
    ReadFailed { path: PathBuf, source: io::Error },

    #[error("Failed to write cache file {path:?}: {source}")]
    CacheWriteFailed { path: PathBuf, source: io::Error },

    #[error("Document {0:?} is empty")]
    Empty(PathBuf),
}

/// Failure of a single work item invocation
///
/// Fatal to the worker that observed it, never to the stage.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WorkError {
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Verification failed: {0}")]
    Verification(String),
}

pub type Result<T> = std::result::Result<T, BenchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawn_error_message() {
        let err = BenchError::Spawn {
            worker_id: 3,
            worker_count: 8,
            source: io::Error::new(io::ErrorKind::WouldBlock, "resource temporarily unavailable"),
        };
        assert_eq!(
            err.to_string(),
            "Failed to spawn worker 3 of 8: resource temporarily unavailable"
        );
    }

    #[test]
    fn test_document_error_message() {
        let err = BenchError::Document(DocumentError::Empty(PathBuf::from(".reddit.html")));
        assert_eq!(err.to_string(), "Document error: Document \".reddit.html\" is empty");
    }
}

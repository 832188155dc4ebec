//! In-memory sample document

use std::path::{Path, PathBuf};

use crate::utils::DocumentError;

/// Sample HTML document shared by all workers of a sweep
///
/// Thread-safe: immutable after construction, share via Arc.
#[derive(Debug, Clone)]
pub struct Document {
    /// Decoded text (invalid UTF-8 replaced)
    text: String,

    /// Size of the raw payload before decoding
    byte_len: usize,

    /// Where the payload was read from
    origin: PathBuf,
}

impl Document {
    /// Build a document from raw bytes
    pub fn from_bytes(bytes: Vec<u8>, origin: impl Into<PathBuf>) -> Result<Self, DocumentError> {
        let origin = origin.into();
        if bytes.is_empty() {
            return Err(DocumentError::Empty(origin));
        }

        let byte_len = bytes.len();
        let text = match String::from_utf8(bytes) {
            Ok(text) => text,
            Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
        };

        Ok(Self {
            text,
            byte_len,
            origin,
        })
    }

    /// Read a document from disk
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, DocumentError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| DocumentError::ReadFailed {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_bytes(bytes, path)
    }

    /// Document text
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Raw payload size in bytes
    pub fn byte_len(&self) -> usize {
        self.byte_len
    }

    /// Path the document was loaded from
    pub fn origin(&self) -> &Path {
        &self.origin
    }

    /// One-line summary for logs
    pub fn summary(&self) -> String {
        format!("Document {:?}: {} bytes", self.origin, self.byte_len)
    }
}

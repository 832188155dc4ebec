//! Sample document loading
//!
//! The benchmark parses one fixed HTML page over and over. It is fetched
//! once, cached next to the working directory, and then shared read-only by
//! every worker through an `Arc<Document>`.

pub mod context;
pub mod source;

pub use context::Document;
pub use source::{DocumentSource, DEFAULT_CACHE_PATH, DEFAULT_DOCUMENT_URL};

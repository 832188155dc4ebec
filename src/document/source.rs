//! Where the sample document comes from
//!
//! Either a local file given on the command line, or a URL that is
//! downloaded once into a cache file and reused on later runs.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::{debug, info};

use super::context::Document;
use crate::utils::{DocumentError, Result};

/// Sample page used when no document is given
pub const DEFAULT_DOCUMENT_URL: &str =
    "https://raw.githubusercontent.com/lorien/lxmlbench/master/data/reddit.html";

/// Cache file for the downloaded sample page
pub const DEFAULT_CACHE_PATH: &str = ".reddit.html";

/// Document origin
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentSource {
    /// Download `url` into `cache_path` unless the cache already exists
    Cached {
        url: String,
        cache_path: PathBuf,
        timeout: Duration,
    },
    /// Read a local file, never touch the network
    Local(PathBuf),
}

impl Default for DocumentSource {
    fn default() -> Self {
        Self::Cached {
            url: DEFAULT_DOCUMENT_URL.to_string(),
            cache_path: PathBuf::from(DEFAULT_CACHE_PATH),
            timeout: Duration::from_secs(30),
        }
    }
}

impl DocumentSource {
    /// Load the document, downloading it first if needed
    pub fn load(&self) -> Result<Document> {
        let document = match self {
            Self::Cached {
                url,
                cache_path,
                timeout,
            } => {
                if cache_path.exists() {
                    debug!("Using cached document {:?}", cache_path);
                } else {
                    download_file(url, cache_path, *timeout)?;
                }
                Document::open(cache_path)?
            }
            Self::Local(path) => Document::open(path)?,
        };
        Ok(document)
    }

    /// Path the document will be read from
    pub fn path(&self) -> &Path {
        match self {
            Self::Cached { cache_path, .. } => cache_path,
            Self::Local(path) => path,
        }
    }
}

/// Fetch `url` and write the body to `path`
pub fn download_file(
    url: &str,
    path: &Path,
    timeout: Duration,
) -> std::result::Result<(), DocumentError> {
    info!("Downloading {} to {:?}", url, path);

    let download_failed = |source| DocumentError::DownloadFailed {
        url: url.to_string(),
        source,
    };

    let client = reqwest::blocking::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(download_failed)?;

    let response = client.get(url).send().map_err(download_failed)?;
    let status = response.status();
    if !status.is_success() {
        return Err(DocumentError::BadStatus {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let body = response.bytes().map_err(download_failed)?;
    if body.is_empty() {
        return Err(DocumentError::Empty(path.to_path_buf()));
    }

    fs::write(path, &body).map_err(|source| DocumentError::CacheWriteFailed {
        path: path.to_path_buf(),
        source,
    })?;

    debug!("Cached {} bytes at {:?}", body.len(), path);
    Ok(())
}

//! Local filesystem response cache.
//!
//! Caches raw HTTP response bodies between runs so repeated invocations
//! do not re-fetch unchanged pages. Entries are keyed by the SHA-256 of
//! the request URL.
//!
//! ## Storage Layout
//!
//! ```text
//! {root}/
//! ├── 9f86d081884c7d65...   # body bytes for one URL
//! └── a591a6d40bf42040...
//! ```

use std::path::PathBuf;

use sha2::{Digest, Sha256};
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};

/// On-disk HTTP response cache.
#[derive(Debug, Clone)]
pub struct ResponseCache {
    root_dir: PathBuf,
}

impl ResponseCache {
    /// Create a new cache rooted at the given directory.
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
        }
    }

    /// Cache file path for a URL.
    fn path_for(&self, url: &str) -> PathBuf {
        let digest = Sha256::digest(url.as_bytes());
        self.root_dir.join(hex::encode(digest))
    }

    /// Read a cached body, returning None on a miss.
    pub async fn get(&self, url: &str) -> Result<Option<Vec<u8>>> {
        let path = self.path_for(url);
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Io(e)),
        }
    }

    /// Store a body atomically (write to temp, then rename).
    pub async fn put(&self, url: &str, bytes: &[u8]) -> Result<()> {
        let path = self.path_for(url);
        tokio::fs::create_dir_all(&self.root_dir).await?;

        let tmp = path.with_extension("tmp");
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        drop(file);

        tokio::fs::rename(&tmp, &path).await?;
        Ok(())
    }

    /// Remove every cached entry. A missing cache directory is not an error.
    pub async fn clear(&self) -> Result<()> {
        match tokio::fs::remove_dir_all(&self.root_dir).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::Io(e)),
        }
    }
}

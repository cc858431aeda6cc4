//! Content fingerprints for dataset files.

use serde::Serialize;
use spotifire_common::{Result, SpotifireError};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Identity of a dataset file at a point in time.
///
/// Two fingerprints are equal only when the file at the same canonical path
/// has the same length and modification time, so a rewritten file yields a
/// new cache key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct DatasetFingerprint {
    /// Canonicalized file path.
    pub path: PathBuf,
    /// Length in bytes.
    pub len: u64,
    /// Last modification time, when the platform reports one.
    pub modified: Option<SystemTime>,
}

impl DatasetFingerprint {
    /// Fingerprints the file at `path`.
    pub async fn of(path: &Path) -> Result<Self> {
        let canonical = tokio::fs::canonicalize(path)
            .await
            .map_err(|e| SpotifireError::ingest_with_source("cannot resolve dataset", path, e))?;
        let metadata = tokio::fs::metadata(&canonical)
            .await
            .map_err(|e| SpotifireError::ingest_with_source("cannot stat dataset", path, e))?;

        if !metadata.is_file() {
            return Err(SpotifireError::ingest("dataset is not a regular file", path));
        }

        Ok(Self {
            path: canonical,
            len: metadata.len(),
            modified: metadata.modified().ok(),
        })
    }
}

impl fmt::Display for DatasetFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} bytes)", self.path.display(), self.len)
    }
}
